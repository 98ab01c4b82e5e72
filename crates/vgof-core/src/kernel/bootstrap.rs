use std::sync::Arc;

use crate::config::KernelConfig;
use crate::kernel::application::{Application, APPLICATION_SERVICE_ID};
use crate::kernel::constants;
use crate::kernel::error::{Error, KernelLifecyclePhase, Result};
use crate::kernel::fault::catch_fault;
use crate::module_system::dispatch::{dispatch, DispatchReport};
use crate::module_system::loader::{load_modules, DynamicLoader, ModuleLoader};
use crate::module_system::started::{ShutdownReport, StartedModules};
use crate::module_system::traits::ModuleBox;
use crate::service::ServiceRegistry;

/// The runtime context: one service registry, the loader that feeds it
/// modules, and the stack of modules started so far.
///
/// Typical use is [`boot`](Kernel::boot) followed by [`start`](Kernel::start).
/// Started modules are always stopped, in reverse start order, when `start`
/// returns or when the kernel is dropped, whichever comes first.
pub struct Kernel {
    config: KernelConfig,
    registry: Arc<ServiceRegistry>,
    loader: Box<dyn ModuleLoader>,
    started: StartedModules,
    application_ran: bool,
}

impl Kernel {
    /// Kernel loading modules from shared libraries in the configured directory.
    pub fn new(config: KernelConfig) -> Result<Self> {
        let loader = DynamicLoader::from_config(&config);
        Self::with_loader(config, Box::new(loader))
    }

    /// Kernel using a custom loader.
    pub fn with_loader(config: KernelConfig, loader: Box<dyn ModuleLoader>) -> Result<Self> {
        log::info!("Initializing {} v{}", constants::APP_NAME, constants::APP_VERSION);
        log::info!("Using module directory: {}", config.module_dir().display());

        let registry = Arc::new(ServiceRegistry::new());
        if config.global_registry() {
            ServiceRegistry::set_global(registry.clone()).map_err(|e| Error::KernelLifecycleError {
                phase: KernelLifecyclePhase::Bootstrap,
                message: "Could not designate the process-wide service registry".to_string(),
                source: Some(Box::new(e.into())),
            })?;
            log::info!("Service registry designated as process-wide registry");
        }

        Ok(Kernel {
            config,
            registry,
            loader,
            started: StartedModules::new(),
            application_ran: false,
        })
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<ServiceRegistry> {
        &self.registry
    }

    pub fn started_modules(&self) -> &StartedModules {
        &self.started
    }

    /// Load every module the loader can discover.
    pub fn load_all(&self) -> Result<Vec<ModuleBox>> {
        let names = self.loader.discover()?;
        log::info!("Loading {} module(s): {}", names.len(), names.join(", "));
        self.load_list(&names)
    }

    /// Load exactly the named modules. Any failure aborts the whole load.
    pub fn load_list<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<ModuleBox>> {
        Ok(load_modules(self.loader.as_ref(), names)?)
    }

    /// Start `modules` as their dependencies allow. See [`dispatch`].
    pub fn dispatch(&mut self, modules: Vec<ModuleBox>) -> Result<DispatchReport> {
        let report = dispatch(&self.registry, modules, &mut self.started)?;
        log::info!(
            "Dispatch finished after {} pass(es): {} started, {} not installed",
            report.passes,
            report.started.len(),
            report.unsatisfied.len()
        );
        Ok(report)
    }

    /// Load the configured module list (or everything discoverable) and
    /// dispatch it.
    pub fn boot(&mut self) -> Result<DispatchReport> {
        let modules = match self.config.modules() {
            Some(names) => self.load_list(names)?,
            None => self.load_all()?,
        };
        self.dispatch(modules)
    }

    /// Run the application service, then stop every started module.
    ///
    /// Shutdown happens whatever the outcome: a missing application service,
    /// an error returned from `main`, or a panic inside it. The outcome is
    /// reported after shutdown completes.
    pub fn start(&mut self) -> Result<()> {
        if self.application_ran {
            return Err(Error::lifecycle(
                KernelLifecyclePhase::Start,
                "Application has already run on this kernel",
            ));
        }
        self.application_ran = true;

        let registry = self.registry.clone();
        let _shutdown = ShutdownGuard {
            started: &mut self.started,
            registry: &registry,
        };
        run_application(&registry)
    }

    /// Stop every module still on the started stack. Safe to call repeatedly.
    pub fn shutdown(&mut self) -> ShutdownReport {
        stop_started(&mut self.started, &self.registry)
    }
}

impl Drop for Kernel {
    fn drop(&mut self) {
        if !self.started.is_empty() {
            self.shutdown();
        }
    }
}

/// Stops started modules when it goes out of scope.
struct ShutdownGuard<'a> {
    started: &'a mut StartedModules,
    registry: &'a ServiceRegistry,
}

impl Drop for ShutdownGuard<'_> {
    fn drop(&mut self) {
        stop_started(self.started, self.registry);
    }
}

fn stop_started(started: &mut StartedModules, registry: &ServiceRegistry) -> ShutdownReport {
    if started.is_empty() {
        return ShutdownReport::default();
    }
    log::info!("Shutting down {} module(s)...", started.len());
    let report = started.stop_all(registry);
    if report.is_clean() {
        log::info!("Module shutdown complete.");
    } else {
        log::warn!(
            "Module shutdown complete with {} failure(s): {}",
            report.failed.len(),
            report.failed.join(", ")
        );
    }
    report
}

fn run_application(registry: &ServiceRegistry) -> Result<()> {
    let app = registry
        .locate_as::<Arc<dyn Application>>(&APPLICATION_SERVICE_ID)
        .map_err(|e| {
            log::error!("Application service is not available: {}", e);
            Error::KernelLifecycleError {
                phase: KernelLifecyclePhase::Start,
                message: "Application service is not installed".to_string(),
                source: Some(Box::new(e.into())),
            }
        })?;

    log::info!("Starting application.");
    match catch_fault(|| app.main(registry)) {
        Ok(Ok(())) => {
            log::info!("Application returned.");
            Ok(())
        }
        // Already classified, e.g. by the guard `install_application` adds.
        Ok(Err(e @ (Error::ApplicationFault { .. } | Error::UnknownFault { .. }))) => {
            log::error!("Application faulted: {}", e);
            Err(e)
        }
        Ok(Err(e)) => {
            log::error!("Application failed: {}", e);
            Err(Error::ApplicationFault {
                message: e.to_string(),
                source: Some(Box::new(e)),
            })
        }
        Err(fault) => {
            log::error!("Application faulted: {}", fault);
            Err(fault.into_error("application main"))
        }
    }
}
