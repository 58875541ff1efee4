//! # winjobs-ports
//!
//! Port traits for the antares-winjobs hexagonal architecture.
//!
//! This crate defines the interfaces between the application layer
//! (`winjobs-app`) and infrastructure (`winjobs-adapters`). It depends only
//! on `winjobs-domain` and `winjobs-shared`.
//!
//! Every port here is a blocking trait: the operations they front are
//! filesystem access and external process calls, which spec.md §4.5–§4.7
//! treats as opaque blocking calls. Callers from async contexts (the driver's
//! axum handlers) offload them with `tokio::task::spawn_blocking`; the worker
//! loop calls them directly, since it is itself a single-threaded, cooperative
//! loop that blocks on one step at a time by design.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod archive;
pub mod logger;
pub mod queue_store;
pub mod stitch;
pub mod study;

pub use archive::ArchivePort;
pub use logger::{LogEvent, LogFields, LogLevel, LoggerPort};
pub use queue_store::{PersistedFinishedJob, PersistedPendingJob, PersistedQueueState, QueueStorePort};
pub use stitch::OutputStitchPort;
pub use study::StudyHandlePort;

/// Returns the ports crate version.
#[must_use]
pub const fn ports_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ports_crate_compiles() {
        assert!(!ports_crate_version().is_empty());
    }
}
