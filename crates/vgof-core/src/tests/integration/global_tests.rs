//! The process-wide registry can be designated once per process, so this
//! is the only test that asks a kernel for it.
use std::sync::Arc;

use crate::kernel::error::KernelLifecyclePhase;
use crate::service::ServiceError;
use crate::{Kernel, KernelConfig, KernelError, ServiceRegistry, StaticLoader};

#[test]
fn test_global_registry_is_designated_once() {
    let config = KernelConfig::default().with_global_registry(true);
    let kernel = Kernel::with_loader(config.clone(), Box::new(StaticLoader::new())).unwrap();

    let global = ServiceRegistry::global().expect("global registry should be set");
    assert!(Arc::ptr_eq(&global, kernel.registry()));

    let err = Kernel::with_loader(config, Box::new(StaticLoader::new()))
        .err()
        .expect("a second designation must fail");
    match err {
        KernelError::KernelLifecycleError { phase, source, .. } => {
            assert_eq!(phase, KernelLifecyclePhase::Bootstrap);
            assert!(matches!(
                source.as_deref(),
                Some(KernelError::ServiceRegistry(ServiceError::GlobalRegistryAlreadySet))
            ));
        }
        other => panic!("unexpected error: {}", other),
    }

    // The first designation stands.
    let again = ServiceRegistry::global().unwrap();
    assert!(Arc::ptr_eq(&again, kernel.registry()));

    let direct = ServiceRegistry::set_global(Arc::new(ServiceRegistry::new()));
    assert!(direct.is_err());
}
