//! # vgof Core Module System Errors
//!
//! Defines [`ModuleSystemError`], covering discovery, loading and dispatch
//! failures. Modules whose dependencies never become satisfied are not
//! errors; they are reported in the
//! [`DispatchReport`](crate::module_system::dispatch::DispatchReport).
use std::path::PathBuf;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ModuleSystemError {
    #[error("Bad parameter: {0}")]
    BadParameter(String),

    #[error("No modules will load: nothing matching '*.{extension}' in {location}")]
    NoModulesFound { location: String, extension: String },

    #[error("Module loading failed for '{module}': {source}")]
    LoadFailure {
        module: String,
        path: Option<PathBuf>,
        #[source]
        source: Box<ModuleSystemErrorSource>,
    },

    #[error("Module '{module}' was built against core {module_abi}, which is incompatible with core {host_abi}")]
    IncompatibleModule {
        module: String,
        module_abi: String,
        host_abi: String,
    },

    #[error("Module '{module}' faulted during {phase}: {message}")]
    ModuleFault {
        module: String,
        phase: ModulePhase,
        message: String,
    },

    #[error("I/O error during '{operation}' on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, ThisError)]
pub enum ModuleSystemErrorSource {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Library(#[from] libloading::Error),
    #[error(transparent)]
    Version(#[from] semver::Error),
    #[error("{0}")]
    Other(String),
}

/// Module contract call during which a fault happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum ModulePhase {
    #[error("CheckDepend")]
    CheckDepend,
    #[error("Start")]
    Start,
    #[error("Stop")]
    Stop,
}

impl ModuleSystemError {
    pub fn load_failure(
        module: impl Into<String>,
        path: Option<PathBuf>,
        source: impl Into<ModuleSystemErrorSource>,
    ) -> Self {
        ModuleSystemError::LoadFailure {
            module: module.into(),
            path,
            source: Box::new(source.into()),
        }
    }

    pub fn io(source: std::io::Error, operation: impl Into<String>, path: PathBuf) -> Self {
        ModuleSystemError::Io {
            path,
            operation: operation.into(),
            source,
        }
    }
}

impl From<String> for ModuleSystemErrorSource {
    fn from(msg: String) -> Self {
        ModuleSystemErrorSource::Other(msg)
    }
}

impl From<&str> for ModuleSystemErrorSource {
    fn from(msg: &str) -> Self {
        ModuleSystemErrorSource::Other(msg.to_string())
    }
}
