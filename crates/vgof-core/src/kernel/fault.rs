//! Panic capture at module and application boundaries.
use std::any::Any;
use std::error::Error as StdError;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use crate::kernel::error::Error;

/// What a caught panic carried.
#[derive(Debug)]
pub enum Fault {
    /// `panic!("...")` style payloads.
    Message(String),
    /// An error raised with `std::panic::panic_any`.
    Error(Box<dyn StdError + Send + Sync>),
    /// Any other payload.
    Unknown,
}

impl Fault {
    /// Classify a panic payload.
    ///
    /// Payload types are matched by type id, so this has to run in the
    /// image that raised the panic. Module images get that through
    /// [`GuardedModule`](crate::module_system::guard::GuardedModule) and the
    /// application guard.
    pub fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let payload = match payload.downcast::<&'static str>() {
            Ok(msg) => return Fault::Message((*msg).to_string()),
            Err(payload) => payload,
        };
        let payload = match payload.downcast::<String>() {
            Ok(msg) => return Fault::Message(*msg),
            Err(payload) => payload,
        };
        let payload = match payload.downcast::<Error>() {
            Ok(err) => return Fault::Error(err),
            Err(payload) => payload,
        };
        match payload.downcast::<Box<dyn StdError + Send + Sync>>() {
            Ok(err) => Fault::Error(*err),
            Err(_) => Fault::Unknown,
        }
    }

    /// Convert into a reportable kernel error. `context` names what was
    /// running when the fault happened.
    pub fn into_error(self, context: &str) -> Error {
        match self {
            Fault::Message(message) => Error::ApplicationFault {
                message,
                source: None,
            },
            Fault::Error(source) => Error::ApplicationFault {
                message: source.to_string(),
                source: Some(source),
            },
            Fault::Unknown => Error::UnknownFault {
                context: context.to_string(),
            },
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::Message(msg) => write!(f, "panic: {}", msg),
            Fault::Error(err) => write!(f, "panic: {}", err),
            Fault::Unknown => write!(f, "panic with unknown payload"),
        }
    }
}

/// Run `f`, turning a panic into a [`Fault`].
pub fn catch_fault<F, R>(f: F) -> Result<R, Fault>
where
    F: FnOnce() -> R,
{
    // Callers never observe state left behind by a panicking `f` except
    // through the registry, whose lock recovers from poisoning.
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(Fault::from_payload)
}
