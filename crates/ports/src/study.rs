//! Study-handle boundary contract (spec.md §4.5).
//!
//! The core scheduling/assignment protocol depends only on these operations;
//! the INI parsing, process invocation, and log inspection behind them are
//! external collaborators, specified here only at their contract.

use std::path::{Path, PathBuf};

use winjobs_domain::YearIndex;
use winjobs_shared::Result;

/// Boundary contract for operations on an already-extracted Antares study.
pub trait StudyHandlePort: Send + Sync {
    /// True iff `path` is a directory containing `input`, `output`, and
    /// `study.antares`.
    fn is_valid_study(&self, study_path: &Path) -> bool;

    /// Parse `settings/generaldata.ini` and compute the active playlist —
    /// the default `[0, nbyears)` range, reset by `playlist_reset`, or
    /// trimmed by repeated `playlist_year -` keys. See §4.5.
    fn get_active_playlist_years(&self, study_path: &Path) -> Result<Vec<YearIndex>>;

    /// Overwrite `[playlist]` with `playlist_reset=false` and one
    /// `playlist_year +` entry per year.
    fn set_playlist(&self, study_path: &Path, years: &[YearIndex]) -> Result<()>;

    /// Create `output/<timestamp>` (a compact ISO `YYYYMMDD_HHMMSS` name)
    /// and return its absolute path.
    fn create_output_collection_folder(&self, study_path: &Path) -> Result<PathBuf>;

    /// Spawn the external solver against `study_path` with `cores` parallel
    /// workers and wait for it to exit. Fails on non-zero exit status.
    fn run_antares(&self, exe_path: &Path, study_path: &Path, cores: u32) -> Result<()>;

    /// Inspect the last 5 lines of the most recent output subfolder's
    /// `simulation.log` for the solver's success marker.
    fn verify_if_last_run_was_successful(&self, study_path: &Path) -> Result<bool>;
}
