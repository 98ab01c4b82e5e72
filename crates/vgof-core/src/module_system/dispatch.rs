use crate::kernel::error::Error;
use crate::kernel::fault::catch_fault;
use crate::module_system::error::{ModulePhase, ModuleSystemError};
use crate::module_system::started::StartedModules;
use crate::module_system::traits::ModuleBox;
use crate::service::ServiceRegistry;

/// What one [`dispatch`] call did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Modules started, in start order.
    pub started: Vec<String>,
    /// Modules whose dependencies were never satisfied, in submission order.
    pub unsatisfied: Vec<String>,
    /// Number of passes over the dispatch set, including the final one that
    /// made no progress.
    pub passes: usize,
}

impl DispatchReport {
    pub fn is_complete(&self) -> bool {
        self.unsatisfied.is_empty()
    }
}

/// Start every module whose dependencies can be satisfied.
///
/// Modules are visited in submission order. A module whose `check_depend`
/// says no is left for a later pass; a pass in which some `start` installed
/// a new service is followed by another pass. The loop ends after the first
/// pass without progress. Since each module starts at most once this takes
/// at most `modules.len() + 1` passes, and modules that need each other's
/// services simply never start.
///
/// Started modules are pushed onto `started` as they start. If a module
/// faults, dispatch stops right there and the modules started so far remain
/// on `started` for the caller to shut down.
pub fn dispatch(
    registry: &ServiceRegistry,
    modules: Vec<ModuleBox>,
    started: &mut StartedModules,
) -> Result<DispatchReport, ModuleSystemError> {
    if modules.is_empty() {
        return Err(ModuleSystemError::BadParameter(
            "no modules to dispatch".to_string(),
        ));
    }

    let mut pending: Vec<Option<ModuleBox>> = modules.into_iter().map(Some).collect();
    let mut report = DispatchReport::default();

    loop {
        report.passes += 1;
        let mut progress = false;

        for slot in pending.iter_mut() {
            let Some(module) = slot.as_mut() else {
                continue; // already initialized
            };

            let ready = catch_fault(|| module.check_depend(registry))
                .map_err(|fault| fault_error(module.name(), ModulePhase::CheckDepend, fault.to_string()))?;
            if !ready {
                log::debug!("Module {} dependence fail.", module.name());
                continue;
            }

            log::info!("Start module {}.", module.name());
            let installed = match catch_fault(|| module.start(registry)) {
                Ok(Ok(installed)) => installed,
                Ok(Err(e)) => return Err(contract_error(module.name(), ModulePhase::Start, e)),
                Err(fault) => return Err(fault_error(module.name(), ModulePhase::Start, fault.to_string())),
            };
            progress |= installed;

            if let Some(module) = slot.take() {
                report.started.push(module.name().to_string());
                started.push(module);
            }
        }

        log::debug!(
            "Dispatch pass {} finished, {} module(s) started so far",
            report.passes,
            report.started.len()
        );
        if !progress {
            break;
        }
    }

    for module in pending.into_iter().flatten() {
        log::warn!("Module {} has not been installed.", module.name());
        report.unsatisfied.push(module.name().to_string());
    }
    Ok(report)
}

/// Error for a contract call that returned `Err`. Faults already
/// classified by a module guard are passed through as they are.
pub(crate) fn contract_error(module: &str, phase: ModulePhase, error: Error) -> ModuleSystemError {
    match error {
        Error::ModuleSystem(fault @ ModuleSystemError::ModuleFault { .. }) => fault,
        other => fault_error(module, phase, other.to_string()),
    }
}

pub(crate) fn fault_error(module: &str, phase: ModulePhase, message: String) -> ModuleSystemError {
    log::error!("Module {} faulted during {}: {}", module, phase, message);
    ModuleSystemError::ModuleFault {
        module: module.to_string(),
        phase,
        message,
    }
}
