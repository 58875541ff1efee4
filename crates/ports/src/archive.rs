//! Study-archive boundary contract (§1: "out of scope, specified only at
//! its boundary").
//!
//! The zip format, compression backend (built-in `zip` crate vs. an external
//! `7z` binary), and traversal-safety details are the adapter's concern; the
//! application layer only needs these two operations.

use std::path::Path;

use winjobs_shared::Result;

/// Boundary contract for archiving and extracting a study folder.
pub trait ArchivePort: Send + Sync {
    /// Extract `zip_path` into `destination_dir`, creating it if absent.
    fn extract(&self, zip_path: &Path, destination_dir: &Path) -> Result<()>;

    /// Archive `source_dir` into `zip_path`, excluding the `output/`
    /// subtree (per §1: the archive routine excludes prior run outputs).
    fn archive_excluding_output(&self, source_dir: &Path, zip_path: &Path) -> Result<()>;
}
