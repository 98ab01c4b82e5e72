pub mod config;
pub mod kernel;
pub mod module_system;
pub mod service;

// Re-export key public types/traits for easier use by the binary and modules
pub use config::KernelConfig;
pub use kernel::{Application, Kernel, APPLICATION_SERVICE_ID};
pub use kernel::error::{Error as KernelError, Result as KernelResult};
pub use module_system::{DynamicLoader, Module, ModuleLoader, StaticLoader};
pub use service::{Service, ServiceId, ServiceRegistry};

// Used by `declare_module!` expansions in module crates.
#[doc(hidden)]
pub use log;

#[cfg(test)]
mod tests;
