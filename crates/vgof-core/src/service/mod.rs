//! # vgof Core Service Registry
//!
//! Services are the only coupling between independently built modules. A
//! module installs an opaque value under a [`ServiceId`] and any other module
//! (or the application) may locate it by the same identifier, without either
//! side knowing about the other at compile time.
//!
//! ## Key Submodules:
//!
//! - **[`id`]**: The 128-bit [`ServiceId`] used as the registry key.
//! - **[`registry`]**: The concurrent [`ServiceRegistry`] table with
//!   install/replace/uninstall/locate/check operations and the optional
//!   process-wide singleton.
//! - **[`error`]**: [`ServiceError`](error::ServiceError) for registry failures.
pub mod error;
pub mod id;
pub mod registry;

pub use error::ServiceError;
pub use id::ServiceId;
pub use registry::{Service, ServiceRegistry};
