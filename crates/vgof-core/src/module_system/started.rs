use std::fmt;

use crate::kernel::fault::catch_fault;
use crate::module_system::dispatch::{contract_error, fault_error};
use crate::module_system::error::{ModulePhase, ModuleSystemError};
use crate::module_system::traits::ModuleBox;
use crate::service::ServiceRegistry;

/// Modules in the order they were started. Shutdown consumes it from the top.
#[derive(Default)]
pub struct StartedModules {
    stack: Vec<ModuleBox>,
}

/// Outcome of stopping every started module.
#[derive(Debug, Default)]
pub struct ShutdownReport {
    /// Modules that stopped cleanly, in stop order.
    pub stopped: Vec<String>,
    /// Modules whose `stop` returned an error or panicked, in stop order.
    pub failed: Vec<String>,
    /// One `Stop` phase [`ModuleFault`](ModuleSystemError::ModuleFault) per
    /// entry in `failed`.
    pub errors: Vec<ModuleSystemError>,
}

impl ShutdownReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

impl StartedModules {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    pub fn push(&mut self, module: ModuleBox) {
        self.stack.push(module);
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Names in start order.
    pub fn names(&self) -> Vec<String> {
        self.stack.iter().map(|m| m.name().to_string()).collect()
    }

    /// Stop every module, most recently started first, emptying the stack.
    ///
    /// A module that fails to stop is logged and skipped; it never keeps the
    /// remaining modules from being stopped.
    pub fn stop_all(&mut self, registry: &ServiceRegistry) -> ShutdownReport {
        let mut report = ShutdownReport::default();
        while let Some(mut module) = self.stack.pop() {
            let name = module.name().to_string();
            log::info!("Stopping module {}", name);
            let error = match catch_fault(|| module.stop(registry)) {
                Ok(Ok(())) => {
                    report.stopped.push(name);
                    continue;
                }
                Ok(Err(e)) => contract_error(&name, ModulePhase::Stop, e),
                Err(fault) => fault_error(&name, ModulePhase::Stop, fault.to_string()),
            };
            report.failed.push(name);
            report.errors.push(error);
        }
        report
    }
}

impl fmt::Debug for StartedModules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.stack.iter().map(|m| m.name())).finish()
    }
}
