//! # winjobs-app
//!
//! Application use cases for the Antares Winjobs batch-execution fabric:
//! the persistent job queue (spec.md §4.4) and the validation/preparation
//! pipeline a submission goes through before it is enqueued (spec.md §4.2,
//! §4.3). Depends only on `winjobs-domain`, `winjobs-ports`, and
//! `winjobs-shared` — no concrete adapter or transport dependency.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod prepare;
pub mod queue;

pub use prepare::{JobSubmission, prepare_job_for_queue, validate_job_parameters};
pub use queue::{FinishTaskRequest, JobQueue, JobSnapshot};

/// Returns the app crate version.
#[must_use]
pub const fn app_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_crate_compiles() {
        assert!(!app_crate_version().is_empty());
    }
}
