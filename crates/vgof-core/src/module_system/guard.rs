//! Module-side half of the library boundary.
//!
//! A module built as a `cdylib` carries its own copy of std, so a panic
//! raised inside it cannot be caught by the host. Everything here is generic
//! or called from the code [`declare_module!`](crate::declare_module)
//! expands to, which compiles it into the module's image: panics are caught
//! and converted to errors before they reach the host.
use std::cell::RefCell;

use crate::kernel::error::{Error, Result};
use crate::kernel::fault::{catch_fault, Fault};
use crate::module_system::error::{ModulePhase, ModuleSystemError};
use crate::module_system::traits::{Module, ModuleBox};
use crate::service::ServiceRegistry;

/// Wraps a module so that none of its contract calls can unwind.
///
/// `check_depend` can only answer yes or no, so a panic there is remembered,
/// reported as ready, and surfaced as a `CheckDepend` fault by the `start`
/// call that follows.
pub struct GuardedModule<M: Module> {
    inner: M,
    check_fault: RefCell<Option<String>>,
}

impl<M: Module> GuardedModule<M> {
    pub fn new(inner: M) -> Self {
        Self {
            inner,
            check_fault: RefCell::new(None),
        }
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }

    fn fault(&self, phase: ModulePhase, fault: Fault) -> Error {
        log::error!("Module {} faulted during {}: {}", self.inner.name(), phase, fault);
        Error::ModuleSystem(ModuleSystemError::ModuleFault {
            module: self.inner.name().to_string(),
            phase,
            message: fault.to_string(),
        })
    }
}

impl<M: Module> Module for GuardedModule<M> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn check_depend(&self, registry: &ServiceRegistry) -> bool {
        match catch_fault(|| self.inner.check_depend(registry)) {
            Ok(ready) => ready,
            Err(fault) => {
                *self.check_fault.borrow_mut() = Some(fault.to_string());
                true
            }
        }
    }

    fn start(&mut self, registry: &ServiceRegistry) -> Result<bool> {
        if let Some(message) = self.check_fault.borrow_mut().take() {
            log::error!("Module {} faulted during {}: {}", self.inner.name(), ModulePhase::CheckDepend, message);
            return Err(Error::ModuleSystem(ModuleSystemError::ModuleFault {
                module: self.inner.name().to_string(),
                phase: ModulePhase::CheckDepend,
                message,
            }));
        }
        let inner = &mut self.inner;
        match catch_fault(|| inner.start(registry)) {
            Ok(result) => result,
            Err(fault) => Err(self.fault(ModulePhase::Start, fault)),
        }
    }

    fn stop(&mut self, registry: &ServiceRegistry) -> Result<()> {
        let inner = &mut self.inner;
        match catch_fault(|| inner.stop(registry)) {
            Ok(result) => result,
            Err(fault) => Err(self.fault(ModulePhase::Stop, fault)),
        }
    }
}

/// Build a module with `constructor` and guard it. A panicking constructor
/// is logged and yields `None`.
pub fn construct_guarded<M: Module + 'static>(constructor: fn() -> M) -> Option<ModuleBox> {
    match catch_fault(constructor) {
        Ok(module) => Some(Box::new(GuardedModule::new(module))),
        Err(fault) => {
            log::error!("Module constructor faulted: {}", fault);
            None
        }
    }
}

/// Route this image's `log` records to `logger`.
///
/// Called by the host right after it opens a module library, with the
/// host's own logger, so module records reach the host's log backend.
pub fn install_logger(logger: &'static dyn log::Log, level: log::LevelFilter) {
    if log::set_logger(logger).is_ok() {
        log::set_max_level(level);
    }
}
