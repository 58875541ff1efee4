//! User-CLI operations: package a study, submit it, poll for completion
//! (SPEC_FULL.md §2 supplement: the `src-user`/`src/user` role).

use std::path::{Path, PathBuf};
use std::time::Duration;

use winjobs_adapters::DriverClient;
use winjobs_api::v1::JobOverviewDto;
use winjobs_ports::ArchivePort;
use winjobs_shared::{Error, ErrorCode, Result};

/// Zip a local study folder, excluding its `output/` subtree, into
/// `local_zip_folder/<study_name>.zip` (spec.md §1: the archive routine
/// excludes prior run outputs).
pub fn package_study(archive: &dyn ArchivePort, study_path: &Path, local_zip_folder: &Path) -> Result<PathBuf> {
    if !study_path.is_dir() {
        return Err(Error::expected(
            ErrorCode::validation("study_path_missing"),
            format!("{} is not a directory", study_path.display()),
        ));
    }

    let study_name = study_path.file_name().ok_or_else(|| {
        Error::expected(ErrorCode::validation("study_path_unnamed"), format!("{} has no file name component", study_path.display()))
    })?;

    std::fs::create_dir_all(local_zip_folder)?;
    let zip_path = local_zip_folder.join(study_name).with_extension("zip");
    archive.archive_excluding_output(study_path, &zip_path)?;
    Ok(zip_path)
}

/// Submit a packaged study to the driver, returning its newly assigned
/// job id (spec.md §4.1 `/submit_job`).
pub async fn submit_study(client: &DriverClient, zip_path: &Path, priority: u8, submitter: &str) -> Result<String> {
    let response = client.submit_job(zip_path, priority, submitter).await?;
    Ok(response.job_id)
}

/// Poll `/job_details/{id}` until `percentage_complete` reaches 100,
/// waiting `poll_interval` between attempts (spec.md §2 supplement).
pub async fn poll_until_complete(client: &DriverClient, job_id: &str, poll_interval: Duration) -> Result<JobOverviewDto> {
    loop {
        let Some(overview) = client.job_details(job_id).await? else {
            return Err(Error::expected(ErrorCode::not_found(), format!("job {job_id} not found")));
        };

        if overview.percentage_complete >= 100 {
            return Ok(overview);
        }

        tokio::time::sleep(poll_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::tempdir;

    #[derive(Default)]
    struct RecordingArchive {
        archived: Mutex<Vec<(PathBuf, PathBuf)>>,
    }

    impl ArchivePort for RecordingArchive {
        fn extract(&self, _zip_path: &Path, _destination_dir: &Path) -> Result<()> {
            Ok(())
        }

        fn archive_excluding_output(&self, source_dir: &Path, zip_path: &Path) -> Result<()> {
            self.archived
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .push((source_dir.to_path_buf(), zip_path.to_path_buf()));
            std::fs::write(zip_path, b"fake zip")?;
            Ok(())
        }
    }

    #[test]
    fn package_study_rejects_missing_study_path() {
        let dir = tempdir().unwrap();
        let archive = RecordingArchive::default();
        let result = package_study(&archive, &dir.path().join("missing"), &dir.path().join("zips"));
        assert!(result.is_err());
    }

    #[test]
    fn package_study_writes_zip_named_after_study_folder() {
        let dir = tempdir().unwrap();
        let study_path = dir.path().join("my_study");
        std::fs::create_dir_all(&study_path).unwrap();
        let archive = RecordingArchive::default();

        let zip_path = package_study(&archive, &study_path, &dir.path().join("zips")).unwrap();
        assert_eq!(zip_path.file_name().unwrap(), "my_study.zip");
        assert!(zip_path.is_file());
    }
}
