//! # vgof Core Module System
//!
//! Everything between "a directory of shared libraries" and "a set of
//! started modules":
//!
//! - **[`traits`]**: the [`Module`] contract and the [`declare_module!`](crate::declare_module)
//!   export macro.
//! - **[`discovery`]**: scanning a directory for module files.
//! - **[`loader`]**: the [`ModuleLoader`] seam with the libloading-based
//!   [`DynamicLoader`] and the in-process [`StaticLoader`].
//! - **[`version`]**: core version and type fingerprint checks for
//!   dynamically loaded modules.
//! - **[`guard`]**: panic capture compiled into each module's own image.
//! - **[`dispatch`]**: the fixed-point engine that starts modules as their
//!   dependencies appear in the service registry.
//! - **[`started`]**: the [`StartedModules`] stack used for reverse-order
//!   shutdown.
//! - **[`error`]**: [`ModuleSystemError`](error::ModuleSystemError).
pub mod discovery;
pub mod dispatch;
pub mod error;
pub mod guard;
pub mod loader;
pub mod started;
pub mod traits;
pub mod version;

pub use dispatch::{dispatch, DispatchReport};
pub use error::{ModulePhase, ModuleSystemError};
pub use loader::{load_modules, DynamicLoader, ModuleLoader, StaticLoader};
pub use started::{ShutdownReport, StartedModules};
pub use traits::{Module, ModuleBox};
pub use version::{abi_fingerprint, MODULE_ABI_VERSION};
