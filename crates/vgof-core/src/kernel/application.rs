use std::sync::Arc;

use crate::kernel::error::Result;
use crate::kernel::fault::catch_fault;
use crate::service::{ServiceError, ServiceId, ServiceRegistry};

/// Well-known identifier of the application service.
pub const APPLICATION_SERVICE_ID: ServiceId =
    ServiceId::from_u128(0x6f1c_2b0e_9d4a_4f3b_a8e2_5c7d_0b91_e3a4);

/// The program body. Exactly one module installs it under
/// [`APPLICATION_SERVICE_ID`]; the kernel calls [`main`](Application::main)
/// once, after dispatch, on the control thread.
pub trait Application: Send + Sync {
    fn main(&self, registry: &ServiceRegistry) -> Result<()>;
}

/// Runs the wrapped application's `main` under a panic guard.
///
/// Being generic, it is compiled into whichever image calls
/// [`install_application`], so a panic in a dynamically loaded module's
/// `main` is caught by that module's own std.
struct GuardedApplication<A> {
    inner: A,
}

impl<A: Application> Application for GuardedApplication<A> {
    fn main(&self, registry: &ServiceRegistry) -> Result<()> {
        match catch_fault(|| self.inner.main(registry)) {
            Ok(result) => result,
            Err(fault) => {
                log::error!("Application main faulted: {}", fault);
                Err(fault.into_error("application main"))
            }
        }
    }
}

/// Install `app` as the application service.
///
/// The registry stores it as an `Arc<dyn Application>`, which is also the
/// type the kernel locates it by.
pub fn install_application<A>(registry: &ServiceRegistry, app: A) -> std::result::Result<(), ServiceError>
where
    A: Application + 'static,
{
    let app: Arc<dyn Application> = Arc::new(GuardedApplication { inner: app });
    registry.install_value(APPLICATION_SERVICE_ID, app)
}
