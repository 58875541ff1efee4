//! Output stitching via symlinks (spec.md §4.6).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use winjobs_domain::YearIndex;
use winjobs_ports::{LogFields, LoggerPort, OutputStitchPort};

/// Create a symlink in `output_dir/economy/mc-ind/<NNNNN>` pointing at the
/// worker's corresponding year subfolder, for each `y` in `years`. A
/// missing worker folder is logged and skipped — it does not fail the
/// caller (§4.6: "Missing folders are logged and skipped").
///
/// `output_dir` is the driver-side aggregated output collection folder
/// (`<study>/output/<timestamp>`); `worker_output_path` is the worker's
/// reported `output_path`, expected to contain `economy/mc-ind/<NNNNN>/`
/// subfolders of its own.
pub fn stitch_year_outputs(output_dir: &Path, worker_output_path: &Path, years: &[YearIndex], logger: &dyn LoggerPort) {
    let driver_mc_ind = output_dir.join("economy").join("mc-ind");
    let worker_mc_ind = worker_output_path.join("economy").join("mc-ind");

    for &year in years {
        let folder_name = year_folder_name(year);
        let source = worker_mc_ind.join(&folder_name);
        let link = driver_mc_ind.join(&folder_name);

        if !source.is_dir() {
            let mut fields = LogFields::new();
            fields.insert("year", year.to_string());
            fields.insert("source", source.display().to_string());
            logger.warn("stitch_missing_folder", "worker output folder missing, skipping symlink", fields);
            continue;
        }

        if let Err(error) = create_year_symlink(&driver_mc_ind, &source, &link) {
            let mut fields = LogFields::new();
            fields.insert("year", year.to_string());
            fields.insert("error", error.to_string());
            logger.warn("stitch_symlink_failed", "failed to create symlink for year output", fields);
        }
    }
}

/// 1-based, zero-padded-to-5-digits folder name for a 0-based year index.
#[must_use]
pub fn year_folder_name(year: YearIndex) -> String {
    format!("{:05}", year + 1)
}

#[cfg(unix)]
fn create_year_symlink(parent: &Path, source: &Path, link: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(parent)?;
    if link.exists() || link.symlink_metadata().is_ok() {
        return Ok(());
    }
    std::os::unix::fs::symlink(source, link)
}

#[cfg(windows)]
fn create_year_symlink(parent: &Path, source: &Path, link: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(parent)?;
    if link.symlink_metadata().is_ok() {
        return Ok(());
    }
    std::os::windows::fs::symlink_dir(source, link)
}

/// Build the absolute driver-side output collection path for a study.
#[must_use]
pub fn output_collection_path(study_output_root: &Path, timestamp: &str) -> PathBuf {
    study_output_root.join(timestamp)
}

/// Symlink-backed `OutputStitchPort`, delegating to [`stitch_year_outputs`].
pub struct SymlinkStitcher {
    logger: Arc<dyn LoggerPort>,
}

impl SymlinkStitcher {
    /// Build a stitcher that logs through `logger`.
    #[must_use]
    pub fn new(logger: Arc<dyn LoggerPort>) -> Self {
        Self { logger }
    }
}

impl OutputStitchPort for SymlinkStitcher {
    fn stitch(&self, output_dir: &Path, worker_output_path: &Path, years: &[YearIndex]) {
        stitch_year_outputs(output_dir, worker_output_path, years, self.logger.as_ref());
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use winjobs_ports::LogEvent;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingLogger {
        events: Mutex<Vec<LogEvent>>,
    }

    impl LoggerPort for RecordingLogger {
        fn log(&self, event: LogEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[test]
    fn stitches_existing_year_folders_and_skips_missing() {
        let driver_root = tempdir().unwrap();
        let worker_root = tempdir().unwrap();

        let worker_year_0 = worker_root.path().join("economy").join("mc-ind").join("00001");
        std::fs::create_dir_all(&worker_year_0).unwrap();

        let logger = RecordingLogger::default();
        stitch_year_outputs(driver_root.path(), worker_root.path(), &[0, 1], &logger);

        let driver_year_0 = driver_root.path().join("economy").join("mc-ind").join("00001");
        assert!(driver_year_0.symlink_metadata().is_ok());

        let driver_year_1 = driver_root.path().join("economy").join("mc-ind").join("00002");
        assert!(driver_year_1.symlink_metadata().is_err());

        let events = logger.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, "stitch_missing_folder");
    }

    #[test]
    fn year_folder_name_is_one_based_zero_padded() {
        assert_eq!(year_folder_name(0), "00001");
        assert_eq!(year_folder_name(41), "00042");
    }
}
