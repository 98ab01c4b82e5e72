use log::info;
use log_sink_api::{locate_sink, LOG_SINK_SERVICE_ID};
use vgof_core::kernel::{constants, install_application};
use vgof_core::{Application, KernelResult, Module, ServiceRegistry};

/// Writes a greeting through the log sink.
pub struct HelloApplication {
    greeting: String,
}

impl HelloApplication {
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            greeting: greeting.into(),
        }
    }
}

impl Default for HelloApplication {
    fn default() -> Self {
        Self::new(format!("Hello from {} v{}!", constants::APP_NAME, constants::APP_VERSION))
    }
}

impl Application for HelloApplication {
    fn main(&self, registry: &ServiceRegistry) -> KernelResult<()> {
        let sink = locate_sink(registry)?;
        sink.write_line(&self.greeting);
        info!("Greeting written");
        Ok(())
    }
}

/// Installs [`HelloApplication`] once a log sink is available.
#[derive(Default)]
pub struct HelloAppModule;

impl Module for HelloAppModule {
    fn name(&self) -> &str {
        "hello-app"
    }

    fn check_depend(&self, registry: &ServiceRegistry) -> bool {
        registry.check_all(&[LOG_SINK_SERVICE_ID])
    }

    fn start(&mut self, registry: &ServiceRegistry) -> KernelResult<bool> {
        install_application(registry, HelloApplication::default())?;
        Ok(true)
    }
}

vgof_core::declare_module!(HelloAppModule, HelloAppModule::default);
