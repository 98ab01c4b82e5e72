#![cfg(test)]

use std::sync::{Arc, Mutex};

use crate::kernel::application::{install_application, Application};
use crate::kernel::error::{Error, Result};
use crate::module_system::traits::Module;
use crate::service::{ServiceId, ServiceRegistry};

/// Shared log of lifecycle calls, e.g. `["start:A", "start:B", "stop:B"]`.
pub type Journal = Arc<Mutex<Vec<String>>>;

pub fn new_journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(journal: &Journal, prefix: &str) -> Vec<String> {
    journal
        .lock()
        .unwrap()
        .iter()
        .filter_map(|e| e.strip_prefix(prefix).map(str::to_string))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StartBehavior {
    Succeed,
    Fail,
    Panic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StopBehavior {
    Succeed,
    Fail,
    Panic,
}

/// Configurable module: needs `requires`, installs `provides` as `u32`
/// services on start, and records every call in the journal.
pub struct TestModule {
    pub name: String,
    pub requires: Vec<ServiceId>,
    pub provides: Vec<ServiceId>,
    pub start_behavior: StartBehavior,
    pub stop_behavior: StopBehavior,
    pub check_panics: bool,
    pub journal: Journal,
}

impl TestModule {
    pub fn new(name: &str, requires: &[ServiceId], provides: &[ServiceId], journal: &Journal) -> Self {
        Self {
            name: name.to_string(),
            requires: requires.to_vec(),
            provides: provides.to_vec(),
            start_behavior: StartBehavior::Succeed,
            stop_behavior: StopBehavior::Succeed,
            check_panics: false,
            journal: journal.clone(),
        }
    }

    pub fn with_start(mut self, behavior: StartBehavior) -> Self {
        self.start_behavior = behavior;
        self
    }

    pub fn with_stop(mut self, behavior: StopBehavior) -> Self {
        self.stop_behavior = behavior;
        self
    }

    pub fn with_check_panic(mut self) -> Self {
        self.check_panics = true;
        self
    }

    pub fn boxed(self) -> Box<dyn Module> {
        Box::new(self)
    }

    fn record(&self, event: &str) {
        self.journal.lock().unwrap().push(format!("{}:{}", event, self.name));
    }
}

impl Module for TestModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn check_depend(&self, registry: &ServiceRegistry) -> bool {
        self.record("check");
        if self.check_panics {
            panic!("{} blew up in check_depend", self.name);
        }
        registry.check_all(&self.requires)
    }

    fn start(&mut self, registry: &ServiceRegistry) -> Result<bool> {
        self.record("start");
        match self.start_behavior {
            StartBehavior::Fail => return Err(Error::Other(format!("{} refused to start", self.name))),
            StartBehavior::Panic => panic!("{} blew up in start", self.name),
            StartBehavior::Succeed => {}
        }
        let mut installed = false;
        for id in &self.provides {
            if registry.install_value(*id, 1u32).is_ok() {
                installed = true;
            }
        }
        Ok(installed)
    }

    fn stop(&mut self, _registry: &ServiceRegistry) -> Result<()> {
        self.record("stop");
        match self.stop_behavior {
            StopBehavior::Succeed => Ok(()),
            StopBehavior::Fail => Err(Error::Other(format!("{} refused to stop", self.name))),
            StopBehavior::Panic => panic!("{} blew up in stop", self.name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MainBehavior {
    Return,
    Fail,
    PanicWithMessage,
    PanicWithUnknownPayload,
}

pub struct TestApplication {
    pub behavior: MainBehavior,
    pub journal: Journal,
}

impl Application for TestApplication {
    fn main(&self, _registry: &ServiceRegistry) -> Result<()> {
        self.journal.lock().unwrap().push("main:app".to_string());
        match self.behavior {
            MainBehavior::Return => Ok(()),
            MainBehavior::Fail => Err(Error::from("test error")),
            MainBehavior::PanicWithMessage => panic!("test error"),
            MainBehavior::PanicWithUnknownPayload => std::panic::panic_any(42u8),
        }
    }
}

/// Module that needs `requires` and installs the application service.
pub struct AppModule {
    pub name: String,
    pub requires: Vec<ServiceId>,
    pub behavior: MainBehavior,
    pub journal: Journal,
}

impl AppModule {
    pub fn new(name: &str, requires: &[ServiceId], behavior: MainBehavior, journal: &Journal) -> Self {
        Self {
            name: name.to_string(),
            requires: requires.to_vec(),
            behavior,
            journal: journal.clone(),
        }
    }
}

impl Module for AppModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn check_depend(&self, registry: &ServiceRegistry) -> bool {
        registry.check_all(&self.requires)
    }

    fn start(&mut self, registry: &ServiceRegistry) -> Result<bool> {
        self.journal.lock().unwrap().push(format!("start:{}", self.name));
        install_application(
            registry,
            TestApplication {
                behavior: self.behavior,
                journal: self.journal.clone(),
            },
        )?;
        Ok(true)
    }

    fn stop(&mut self, _registry: &ServiceRegistry) -> Result<()> {
        self.journal.lock().unwrap().push(format!("stop:{}", self.name));
        Ok(())
    }
}
