//! # winjobs-facade
//!
//! Facade API for the `winjobs-driver`, `winjobs-worker`, and `winjobs-user`
//! binaries. This crate depends on `infra`, `api`, and `app` so consumers
//! only need one dependency line.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

/// Placeholder module for the facade layer.
pub mod placeholder {
    /// Placeholder function to verify the crate compiles.
    #[must_use]
    pub const fn facade_crate_version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

pub use placeholder::facade_crate_version;

/// Driver wiring and HTTP router.
pub use winjobs_infra::{build_driver_state, build_router, DriverState};
/// Worker polling runtime.
pub use winjobs_infra::{determine_worker_cores, run_worker_iteration, run_worker_loop, WorkerLoopConfig};
/// User CLI operations.
pub use winjobs_infra::{package_study, poll_until_complete, submit_study};

/// Typed configuration loading.
pub use winjobs_config::{
    load_driver_config, load_user_config, load_worker_config, DriverConfig, UserConfig, ValidatedDriverConfig,
    ValidatedUserConfig, ValidatedWorkerConfig, WorkerConfig,
};

/// Wire DTOs for the driver HTTP surface.
pub use winjobs_api::v1;

/// Application use cases (job validation, preparation, the queue).
pub use winjobs_app::{JobQueue, JobSnapshot, JobSubmission};

/// Domain entities and value objects.
pub use winjobs_domain::{Job, JobDisposition, JobId, Priority, StudyName, SubmitterId, Task, TaskId, TaskStatus, WorkerName};

/// Boundary contracts (ports) for adapter substitution in tests.
pub use winjobs_ports::{ArchivePort, LoggerPort, OutputStitchPort, StudyHandlePort};

/// Concrete adapters: HTTP client, filesystem study handle, zip archive,
/// structured logging, and queue persistence.
pub use winjobs_adapters::{DriverClient, FsAntaresStudy, JsonLogger, JsonQueueStore, SymlinkStitcher, ZipArchiveAdapter};

/// Shared error envelope and result alias.
pub use winjobs_shared::{Error, ErrorClass, ErrorCode, ErrorKind, Result};

#[cfg(test)]
mod tests {
    use super::*;
    use winjobs_adapters::adapters_crate_version;
    use winjobs_app::app_crate_version;
    use winjobs_infra::infra_crate_version;

    #[test]
    fn facade_crate_compiles() {
        let version = facade_crate_version();
        assert!(!version.is_empty());
    }

    #[test]
    fn facade_can_use_infra_app_adapters() {
        assert!(!infra_crate_version().is_empty());
        assert!(!app_crate_version().is_empty());
        assert!(!adapters_crate_version().is_empty());
    }

    #[test]
    fn facade_reexports_resolve_a_full_roundtrip() {
        let id = JobId::new();
        let parsed = JobId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }
}
