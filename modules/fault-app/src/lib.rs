//! Installs an application that writes one line to the log sink and then
//! panics, so the host's fault path can be run against a real module library.
use log::warn;
use log_sink_api::{locate_sink, LOG_SINK_SERVICE_ID};
use vgof_core::kernel::install_application;
use vgof_core::{Application, KernelResult, Module, ServiceRegistry};

pub const FAULT_MESSAGE: &str = "fault-app: deliberate failure in main";

pub struct FaultApplication;

impl Application for FaultApplication {
    fn main(&self, registry: &ServiceRegistry) -> KernelResult<()> {
        locate_sink(registry)?.write_line("fault-app is about to fail");
        warn!("Failing on purpose");
        panic!("{}", FAULT_MESSAGE);
    }
}

#[derive(Default)]
pub struct FaultAppModule;

impl Module for FaultAppModule {
    fn name(&self) -> &str {
        "fault-app"
    }

    fn check_depend(&self, registry: &ServiceRegistry) -> bool {
        registry.check_all(&[LOG_SINK_SERVICE_ID])
    }

    fn start(&mut self, registry: &ServiceRegistry) -> KernelResult<bool> {
        install_application(registry, FaultApplication)?;
        Ok(true)
    }
}

vgof_core::declare_module!(FaultAppModule, FaultAppModule::default);
