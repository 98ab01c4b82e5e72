//! End-to-end runs through the public API: a provider module, a consumer
//! application module, and the kernel in between.
use std::sync::{Arc, Mutex};

use crate::kernel::install_application;
use crate::{
    Application, Kernel, KernelConfig, KernelError, KernelResult, Module, ServiceId,
    ServiceRegistry, StaticLoader,
};

const GREETER_SERVICE_ID: ServiceId = ServiceId::from_u128(0x9e3e_7e41_0000_0000_0000_0000_0000_0001);

trait Greeter: Send + Sync {
    fn greet(&self, who: &str) -> String;
}

struct PoliteGreeter;

impl Greeter for PoliteGreeter {
    fn greet(&self, who: &str) -> String {
        format!("Hello, {}!", who)
    }
}

struct GreeterModule;

impl Module for GreeterModule {
    fn name(&self) -> &str {
        "greeter"
    }

    fn check_depend(&self, _registry: &ServiceRegistry) -> bool {
        true
    }

    fn start(&mut self, registry: &ServiceRegistry) -> KernelResult<bool> {
        let greeter: Arc<dyn Greeter> = Arc::new(PoliteGreeter);
        registry.install_value(GREETER_SERVICE_ID, greeter)?;
        Ok(true)
    }

    fn stop(&mut self, registry: &ServiceRegistry) -> KernelResult<()> {
        registry.uninstall(&[GREETER_SERVICE_ID]);
        Ok(())
    }
}

struct GreetingApp {
    output: Arc<Mutex<Vec<String>>>,
}

impl Application for GreetingApp {
    fn main(&self, registry: &ServiceRegistry) -> KernelResult<()> {
        let greeter = registry.locate_as::<Arc<dyn Greeter>>(&GREETER_SERVICE_ID)?;
        self.output.lock().unwrap().push(greeter.greet("world"));
        Ok(())
    }
}

struct GreetingAppModule {
    output: Arc<Mutex<Vec<String>>>,
}

impl Module for GreetingAppModule {
    fn name(&self) -> &str {
        "greeting-app"
    }

    fn check_depend(&self, registry: &ServiceRegistry) -> bool {
        registry.check_all(&[GREETER_SERVICE_ID])
    }

    fn start(&mut self, registry: &ServiceRegistry) -> KernelResult<bool> {
        install_application(
            registry,
            GreetingApp {
                output: self.output.clone(),
            },
        )?;
        Ok(true)
    }
}

fn loader(output: &Arc<Mutex<Vec<String>>>) -> StaticLoader {
    let mut loader = StaticLoader::new();
    let out = output.clone();
    loader
        .register("greeting-app", move || GreetingAppModule { output: out.clone() })
        .unwrap();
    loader.register("greeter", || GreeterModule).unwrap();
    loader
}

#[test]
fn test_full_lifecycle_runs_application_against_provided_service() {
    let output = Arc::new(Mutex::new(Vec::new()));
    let mut kernel = Kernel::with_loader(KernelConfig::default(), Box::new(loader(&output))).unwrap();

    let report = kernel.boot().unwrap();
    assert_eq!(report.started, vec!["greeter", "greeting-app"]);

    let registry = kernel.registry().clone();
    kernel.start().unwrap();

    assert_eq!(*output.lock().unwrap(), vec!["Hello, world!".to_string()]);
    assert!(kernel.started_modules().is_empty());
    // The greeter module removed its service on stop; the application
    // service has no owner to remove it.
    assert!(!registry.contains(&GREETER_SERVICE_ID));
    assert!(registry.contains(&crate::APPLICATION_SERVICE_ID));
}

#[test]
fn test_application_without_its_service_reports_failure() {
    let output = Arc::new(Mutex::new(Vec::new()));
    let mut kernel = Kernel::with_loader(KernelConfig::default(), Box::new(loader(&output))).unwrap();

    // Install the application directly, skipping the greeter module.
    install_application(kernel.registry(), GreetingApp { output: output.clone() }).unwrap();
    let err = kernel.start().unwrap_err();

    assert!(matches!(err, KernelError::ApplicationFault { .. }), "unexpected error: {}", err);
    assert!(output.lock().unwrap().is_empty());
}

#[test]
fn test_manual_load_and_dispatch() {
    let output = Arc::new(Mutex::new(Vec::new()));
    let mut kernel = Kernel::with_loader(KernelConfig::default(), Box::new(loader(&output))).unwrap();

    let modules = kernel.load_list(&["greeting-app"]).unwrap();
    let report = kernel.dispatch(modules).unwrap();
    assert!(report.started.is_empty());
    assert_eq!(report.unsatisfied, vec!["greeting-app"]);

    let modules = kernel.load_list(&["greeter", "greeting-app"]).unwrap();
    let report = kernel.dispatch(modules).unwrap();
    assert_eq!(report.started, vec!["greeter", "greeting-app"]);

    kernel.start().unwrap();
    assert_eq!(output.lock().unwrap().len(), 1);
}
