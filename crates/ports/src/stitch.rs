//! Output-stitching boundary contract (spec.md §4.6).
//!
//! Symlink creation is filesystem-specific and best-effort (missing worker
//! folders are logged and skipped, never fail the caller), so it is
//! expressed as a port rather than inline in `winjobs-app`.

use std::path::Path;

use winjobs_domain::YearIndex;

/// Boundary contract for stitching a worker's per-year output folders into
/// the driver's aggregated output collection folder.
pub trait OutputStitchPort: Send + Sync {
    /// For each `y` in `years`, link `output_dir/economy/mc-ind/<NNNNN>` to
    /// the corresponding subfolder under `worker_output_path`. Missing
    /// worker folders are logged and skipped.
    fn stitch(&self, output_dir: &Path, worker_output_path: &Path, years: &[YearIndex]);
}
