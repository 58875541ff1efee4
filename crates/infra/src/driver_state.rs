//! Driver dependency wiring: builds the concrete adapter stack behind
//! `winjobs-app::JobQueue` from a validated `DriverConfig`.

use std::path::PathBuf;
use std::sync::Arc;

use winjobs_adapters::{FsAntaresStudy, JsonLogger, JsonQueueStore, SymlinkStitcher, ZipArchiveAdapter};
use winjobs_app::JobQueue;
use winjobs_config::DriverConfig;
use winjobs_ports::{ArchivePort, LoggerPort, StudyHandlePort};
use winjobs_shared::{Error, Result};

/// Everything an axum handler needs to serve the driver HTTP surface
/// (spec.md §4.1), shared behind an `Arc` across request tasks.
pub struct DriverState {
    /// The prioritized, persistent job queue (spec.md §4.4).
    pub queue: Arc<JobQueue>,
    /// Study-archive extraction (spec.md §1, §4.3).
    pub archive: Arc<dyn ArchivePort>,
    /// Study-folder inspection (spec.md §4.5).
    pub study_handle: Arc<dyn StudyHandlePort>,
    /// Structured logging sink.
    pub logger: Arc<dyn LoggerPort>,
    /// Folder `/submit_job` uploads are persisted into.
    pub new_jobs_zip_folder_path: PathBuf,
    /// Extraction root studies are unpacked into.
    pub new_jobs_study_folder_path: PathBuf,
}

/// Build the driver's dependency graph from a validated config, creating
/// its working folders and loading/reconciling the persisted queue
/// (spec.md §4.4 "Persistence model").
pub fn build_driver_state(config: &DriverConfig) -> Result<Arc<DriverState>> {
    let persisted_queue_folder_path = PathBuf::from(&config.persisted_queue_folder_path);
    let new_jobs_zip_folder_path = PathBuf::from(&config.new_jobs_zip_folder_path);
    let new_jobs_study_folder_path = PathBuf::from(&config.new_jobs_study_folder_path);

    std::fs::create_dir_all(&persisted_queue_folder_path).map_err(Error::from)?;
    std::fs::create_dir_all(&new_jobs_zip_folder_path).map_err(Error::from)?;
    std::fs::create_dir_all(&new_jobs_study_folder_path).map_err(Error::from)?;

    let logger: Arc<dyn LoggerPort> = Arc::new(JsonLogger::stdout());
    let store = Arc::new(JsonQueueStore::new(persisted_queue_folder_path.join("queue.json")));
    let stitcher: Arc<dyn winjobs_ports::OutputStitchPort> = Arc::new(SymlinkStitcher::new(Arc::clone(&logger)));
    let queue = Arc::new(JobQueue::load(store, Arc::clone(&logger), stitcher)?);

    Ok(Arc::new(DriverState {
        queue,
        archive: Arc::new(ZipArchiveAdapter),
        study_handle: Arc::new(FsAntaresStudy),
        logger,
        new_jobs_zip_folder_path,
        new_jobs_study_folder_path,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn build_driver_state_creates_working_folders() {
        let dir = tempdir().unwrap();
        let config = DriverConfig {
            persisted_queue_folder_path: dir.path().join("queue").to_string_lossy().into_owned(),
            new_jobs_zip_folder_path: dir.path().join("zip").to_string_lossy().into_owned(),
            new_jobs_study_folder_path: dir.path().join("studies").to_string_lossy().into_owned(),
            ..DriverConfig::default()
        };

        let state = build_driver_state(&config).unwrap();
        assert!(state.new_jobs_zip_folder_path.is_dir());
        assert!(state.new_jobs_study_folder_path.is_dir());
        assert_eq!(state.queue.get_queue_length(), 0);
    }
}
