//! The worker's long-running polling loop (spec.md §4.7).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use winjobs_adapters::DriverClient;
use winjobs_api::v1::{GetTaskResponse, TaskDoneRequest, TaskRecordDto};
use winjobs_ports::{ArchivePort, StudyHandlePort};
use winjobs_shared::{Error, Result};

use crate::cores::{determine_worker_cores, physical_core_count};

/// Everything a worker iteration needs beyond the `DriverClient` and the
/// study/archive ports.
pub struct WorkerLoopConfig {
    /// This worker's identity, reported to the driver (typically the
    /// hostname).
    pub worker_name: String,
    /// Upper bound on cores to use; `0` means "use all physical cores".
    pub max_cores_to_use: u32,
    /// Local cache of downloaded study archives.
    pub local_zip_folder_path: PathBuf,
    /// Local extraction root for studies this worker runs.
    pub local_study_folder_path: PathBuf,
    /// Path to the Antares solver executable.
    pub antares_file_path: PathBuf,
    /// Target pacing interval between polls.
    pub wait_time_between_requests: std::time::Duration,
}

/// Run one iteration of the loop described in spec.md §4.7 steps 2-8.
/// Returns `true` if a task was assigned and processed, `false` on the
/// no-work sentinel.
pub async fn run_worker_iteration(
    config: &WorkerLoopConfig,
    client: &DriverClient,
    archive: &dyn ArchivePort,
    study_handle: &dyn StudyHandlePort,
) -> Result<bool> {
    let cores = determine_worker_cores(config.max_cores_to_use, physical_core_count());

    let response = client.get_task(&config.worker_name, cores).await?;
    let task = match response {
        GetTaskResponse::NoWork { .. } => return Ok(false),
        GetTaskResponse::Assigned(task) => task,
    };

    let study_path = local_study_path(config, &task);
    ensure_study_extracted(config, archive, &task, &study_path)?;

    study_handle.set_playlist(&study_path, &task.workload)?;
    study_handle.run_antares(&config.antares_file_path, &study_path, cores)?;
    let success = study_handle.verify_if_last_run_was_successful(&study_path)?;

    client
        .task_done(&TaskDoneRequest {
            task_id: task.id,
            job_id: task.job_id,
            workload: task.workload,
            output_path: study_path.to_string_lossy().into_owned(),
            success,
        })
        .await?;

    Ok(true)
}

/// Copy the archive locally and extract it if the study isn't already
/// present (spec.md §4.7 step 4, crash-recovery note: "already-extracted
/// studies are detected by the local path check").
fn ensure_study_extracted(config: &WorkerLoopConfig, archive: &dyn ArchivePort, task: &TaskRecordDto, study_path: &Path) -> Result<()> {
    if study_path.is_dir() {
        return Ok(());
    }

    let local_zip_path = config.local_zip_folder_path.join(format!("{}.zip", task.study_name));
    if !local_zip_path.is_file() {
        std::fs::create_dir_all(&config.local_zip_folder_path)?;
        std::fs::copy(Path::new(&task.zip_file_path), &local_zip_path)?;
    }

    archive.extract(&local_zip_path, study_path)
}

fn local_study_path(config: &WorkerLoopConfig, task: &TaskRecordDto) -> PathBuf {
    config.local_study_folder_path.join(&task.study_name)
}

/// Run the worker loop forever with equidistant pacing (spec.md §4.7
/// steps 1, 9). A single failed iteration is logged and the loop
/// continues rather than aborting the process.
pub async fn run_worker_loop(
    config: Arc<WorkerLoopConfig>,
    client: Arc<DriverClient>,
    archive: Arc<dyn ArchivePort>,
    study_handle: Arc<dyn StudyHandlePort>,
) -> ! {
    loop {
        let deadline = tokio::time::Instant::now() + config.wait_time_between_requests;

        if let Err(error) = run_worker_iteration(&config, &client, archive.as_ref(), study_handle.as_ref()).await {
            log_iteration_error(&error);
        }

        tokio::time::sleep_until(deadline).await;
    }
}

fn log_iteration_error(error: &Error) {
    eprintln!("worker iteration failed: {error}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::tempdir;
    use winjobs_domain::YearIndex;

    #[derive(Default)]
    struct FakeStudyHandle {
        playlist_calls: Mutex<Vec<Vec<YearIndex>>>,
    }

    impl StudyHandlePort for FakeStudyHandle {
        fn is_valid_study(&self, _study_path: &Path) -> bool {
            true
        }

        fn get_active_playlist_years(&self, _study_path: &Path) -> Result<Vec<YearIndex>> {
            Ok(vec![0, 1])
        }

        fn set_playlist(&self, _study_path: &Path, years: &[YearIndex]) -> Result<()> {
            self.playlist_calls.lock().unwrap_or_else(std::sync::PoisonError::into_inner).push(years.to_vec());
            Ok(())
        }

        fn create_output_collection_folder(&self, _study_path: &Path) -> Result<PathBuf> {
            Ok(PathBuf::from("/tmp/out"))
        }

        fn run_antares(&self, _exe_path: &Path, _study_path: &Path, _cores: u32) -> Result<()> {
            Ok(())
        }

        fn verify_if_last_run_was_successful(&self, _study_path: &Path) -> Result<bool> {
            Ok(true)
        }
    }

    #[derive(Default)]
    struct NoopArchive;
    impl ArchivePort for NoopArchive {
        fn extract(&self, _zip_path: &Path, _destination_dir: &Path) -> Result<()> {
            Ok(())
        }

        fn archive_excluding_output(&self, _source_dir: &Path, _zip_path: &Path) -> Result<()> {
            Ok(())
        }
    }

    fn sample_task(dir: &tempfile::TempDir) -> TaskRecordDto {
        TaskRecordDto {
            id: "00000000-0000-0000-0000-000000000000".to_owned(),
            job_id: "00000000-0000-0000-0000-000000000000".to_owned(),
            submitter: "alice".to_owned(),
            priority: 50,
            zip_file_path: dir.path().join("alpha.zip").to_string_lossy().into_owned(),
            study_name: "alpha".to_owned(),
            worker: "w1".to_owned(),
            workload: vec![0, 1],
            percentage_complete: 0,
        }
    }

    #[test]
    fn ensure_study_extracted_skips_when_study_already_local() {
        let dir = tempdir().unwrap();
        let task = sample_task(&dir);
        let config = WorkerLoopConfig {
            worker_name: "w1".to_owned(),
            max_cores_to_use: 0,
            local_zip_folder_path: dir.path().join("zip_cache"),
            local_study_folder_path: dir.path().join("local_studies"),
            antares_file_path: PathBuf::from("/bin/true"),
            wait_time_between_requests: std::time::Duration::from_secs(10),
        };
        let study_path = dir.path().join("local_studies").join("alpha");
        std::fs::create_dir_all(&study_path).unwrap();

        let archive = NoopArchive;
        let result = ensure_study_extracted(&config, &archive, &task, &study_path);
        assert!(result.is_ok());
        assert!(!dir.path().join("zip_cache").join("alpha.zip").exists());
    }

    #[test]
    fn ensure_study_extracted_copies_and_extracts_when_missing() {
        let dir = tempdir().unwrap();
        let task = sample_task(&dir);
        std::fs::write(dir.path().join("alpha.zip"), b"fake zip").unwrap();
        let config = WorkerLoopConfig {
            worker_name: "w1".to_owned(),
            max_cores_to_use: 0,
            local_zip_folder_path: dir.path().join("zip_cache"),
            local_study_folder_path: dir.path().join("local_studies"),
            antares_file_path: PathBuf::from("/bin/true"),
            wait_time_between_requests: std::time::Duration::from_secs(10),
        };
        let study_path = dir.path().join("local_studies").join("alpha");

        let archive = NoopArchive;
        let result = ensure_study_extracted(&config, &archive, &task, &study_path);
        assert!(result.is_ok());
        assert!(dir.path().join("zip_cache").join("alpha.zip").exists());
    }
}
