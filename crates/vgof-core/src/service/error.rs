//! # vgof Core Service Registry Errors
//!
//! Defines [`ServiceError`], returned by fallible [`ServiceRegistry`](super::ServiceRegistry)
//! operations. A missing service is an ordinary outcome callers are expected
//! to handle, not a crash.
use crate::service::id::ServiceId;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("The service {id} has already been installed")]
    AlreadyInstalled { id: ServiceId },

    #[error("The service {id} has not been installed")]
    NotInstalled { id: ServiceId },

    #[error("The service {id} is not of the requested type '{expected}'")]
    TypeMismatch {
        id: ServiceId,
        expected: &'static str,
    },

    #[error("The process-wide service registry has already been set")]
    GlobalRegistryAlreadySet,
}
