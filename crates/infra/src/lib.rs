//! # winjobs-infra
//!
//! Infrastructure wiring: factory functions that build concrete adapters
//! from typed configuration, the driver's axum router, and the worker
//! polling runtime (spec.md §4.7). This is the layer the `winjobs-driver`,
//! `winjobs-worker`, and `winjobs-user` binaries depend on directly.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod cores;
pub mod driver_router;
pub mod driver_state;
pub mod user_ops;
pub mod worker_loop;

pub use cores::determine_worker_cores;
pub use driver_router::build_router;
pub use driver_state::{DriverState, build_driver_state};
pub use user_ops::{package_study, poll_until_complete, submit_study};
pub use worker_loop::{run_worker_iteration, run_worker_loop, WorkerLoopConfig};

/// Returns the infra crate version.
#[must_use]
pub const fn infra_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infra_crate_compiles() {
        assert!(!infra_crate_version().is_empty());
    }
}
