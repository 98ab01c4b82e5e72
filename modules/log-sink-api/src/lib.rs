//! The log sink service contract.
//!
//! Kept apart from the `log-sink` module itself so consumers can depend on
//! the contract without linking a second copy of the module's exports.
use std::sync::Arc;

use vgof_core::service::ServiceError;
use vgof_core::{ServiceId, ServiceRegistry};

/// Identifier the `log-sink` module installs its sink under.
pub const LOG_SINK_SERVICE_ID: ServiceId =
    ServiceId::from_u128(0x3d7a_51c2_8e04_4b6f_9f11_c0a8_72e5_d416);

/// Line-oriented output shared between modules.
pub trait LogSink: Send + Sync {
    /// Queue one line of output.
    fn write_line(&self, line: &str);

    /// Write out everything queued so far.
    fn flush(&self) -> std::io::Result<()>;
}

/// Sinks are stored as `Arc<dyn LogSink>`; this is the matching lookup.
pub fn locate_sink(registry: &ServiceRegistry) -> Result<Arc<dyn LogSink>, ServiceError> {
    registry
        .locate_as::<Arc<dyn LogSink>>(&LOG_SINK_SERVICE_ID)
        .map(|sink| sink.as_ref().clone())
}

/// Install `sink` under [`LOG_SINK_SERVICE_ID`].
pub fn install_sink(registry: &ServiceRegistry, sink: Arc<dyn LogSink>) -> Result<(), ServiceError> {
    registry.install_value(LOG_SINK_SERVICE_ID, sink)
}
