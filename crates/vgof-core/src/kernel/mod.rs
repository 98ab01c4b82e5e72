//! # vgof Core Kernel
//!
//! The `kernel` module ties the service registry and the module system into
//! a runtime.
//!
//! ## Key Responsibilities & Components:
//!
//! - **Bootstrapping**: [`Kernel`](bootstrap::Kernel) owns the registry,
//!   loads modules through a [`ModuleLoader`](crate::module_system::ModuleLoader),
//!   dispatches them and keeps the stack of started modules.
//! - **Application**: the [`Application`](application::Application) service
//!   whose `main` is the program body, installed under
//!   [`APPLICATION_SERVICE_ID`](application::APPLICATION_SERVICE_ID).
//! - **Shutdown**: started modules are stopped in reverse order whatever way
//!   the application ends.
//! - **Faults**: panics at module and application boundaries are caught by
//!   the `fault` submodule and turned into errors.
//! - **Error Handling**: the kernel [`Error`](error::Error) and `Result` alias.
pub mod application;
pub mod bootstrap;
pub mod constants;
pub mod error;
pub mod fault;

pub use application::{install_application, Application, APPLICATION_SERVICE_ID};
pub use bootstrap::Kernel;
pub use error::{Error, Result};
