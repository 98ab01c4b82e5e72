//! # vgof Core Kernel Errors
//!
//! Defines the kernel-level [`Error`], which wraps the typed errors of every
//! subsystem (service registry, module system, configuration) and adds the
//! runtime faults raised while the application runs.
use std::error::Error as StdError;
use std::result::Result as StdResult;

use crate::config::error::ConfigError;
use crate::module_system::error::ModuleSystemError;
use crate::service::error::ServiceError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    /// Specific, typed service registry error
    #[error("Service registry error: {0}")]
    ServiceRegistry(#[from] ServiceError),

    /// Specific, typed module system error (discovery, loading, dispatch)
    #[error("Module system error: {0}")]
    ModuleSystem(#[from] ModuleSystemError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The application's main entry point failed or panicked with a
    /// message or error payload.
    #[error("Application fault: {message}")]
    ApplicationFault {
        message: String,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// A panic whose payload carried neither a message nor an error.
    #[error("Unknown fault during {context}")]
    UnknownFault { context: String },

    /// Error occurring during a specific kernel lifecycle phase.
    #[error("Kernel lifecycle error during {phase}: {message}")]
    KernelLifecycleError {
        phase: KernelLifecyclePhase,
        message: String,
        #[source]
        source: Option<Box<Error>>,
    },

    /// Generic error with message
    #[error("Error: {0}")]
    Other(String),
}

/// Represents a specific phase in the kernel's lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum KernelLifecyclePhase {
    #[error("Bootstrap")]
    Bootstrap,
    #[error("Start")]
    Start,
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl Error {
    pub fn lifecycle(phase: KernelLifecyclePhase, message: impl Into<String>) -> Self {
        Error::KernelLifecycleError {
            phase,
            message: message.into(),
            source: None,
        }
    }
}
