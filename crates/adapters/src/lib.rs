//! # winjobs-adapters
//!
//! Concrete implementations of the `winjobs-ports` boundary contracts:
//! filesystem study handling, zip archiving, JSON queue persistence,
//! structured logging, output stitching, and an HTTP client for talking to
//! the driver from the worker and user binaries.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod ini;

pub mod driver_client;
pub mod fs_study;
pub mod json_logger;
pub mod json_queue_store;
pub mod stitch;
pub mod zip_archive;

pub use driver_client::DriverClient;
pub use fs_study::FsAntaresStudy;
pub use json_logger::JsonLogger;
pub use json_queue_store::JsonQueueStore;
pub use stitch::{SymlinkStitcher, output_collection_path, stitch_year_outputs, year_folder_name};
pub use zip_archive::ZipArchiveAdapter;

/// Returns the adapters crate version.
#[must_use]
pub const fn adapters_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
