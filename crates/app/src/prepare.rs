//! Job validation and preparation use cases (spec.md §4.2, §4.3).

use std::path::{Path, PathBuf};

use winjobs_domain::{Job, Priority, StudyName, StudyRef, SubmitterId, YearIndex};
use winjobs_ports::{ArchivePort, StudyHandlePort};
use winjobs_shared::{Error, ErrorCode, Result};

/// Raw, not-yet-validated parameters for a job submission.
#[derive(Debug, Clone)]
pub struct JobSubmission {
    /// Raw priority value, validated by `validate_job_parameters`.
    pub priority: i64,
    /// Raw submitter string, validated by `validate_job_parameters`.
    pub submitter: String,
    /// Path to the uploaded zip on the shared namespace.
    pub zip_file_path: PathBuf,
    /// Study name derived from the archive filename minus extension.
    pub study_name: String,
}

/// Validate a submission against spec.md §4.2: priority range, non-empty
/// submitter, the uploaded zip exists as a regular file, the extraction
/// root exists and is a directory, and the target extraction subfolder
/// does not yet exist. Never mutates filesystem state.
pub fn validate_job_parameters(submission: &JobSubmission, extraction_root: &Path) -> Result<(Priority, SubmitterId, StudyName)> {
    let priority = Priority::parse(submission.priority)?;
    let submitter = SubmitterId::parse(&submission.submitter)?;
    let study_name = StudyName::parse(&submission.study_name)?;

    if !submission.zip_file_path.is_file() {
        return Err(Error::expected(
            ErrorCode::validation("zip_missing"),
            format!("{} is not a regular file", submission.zip_file_path.display()),
        ));
    }

    if !extraction_root.is_dir() {
        return Err(Error::expected(
            ErrorCode::validation("extraction_root_missing"),
            format!("extraction root {} is not a directory", extraction_root.display()),
        ));
    }

    let target = extraction_root.join(study_name.as_str());
    if target.exists() {
        return Err(Error::expected(
            ErrorCode::validation("study_already_extracted"),
            format!("extraction target {} already exists", target.display()),
        ));
    }

    Ok((priority, submitter, study_name))
}

/// Extract the zip, wrap it in a study handle, create the output
/// collection folder, and compute the job's immutable workload from the
/// study's active playlist (spec.md §4.3). Returns the fully assembled
/// `Job`, not yet enqueued.
pub fn prepare_job_for_queue(
    priority: Priority,
    submitter: SubmitterId,
    zip_file_path: PathBuf,
    study_name: StudyName,
    extraction_root: &Path,
    archive: &dyn ArchivePort,
    study_handle: &dyn StudyHandlePort,
) -> Result<Job> {
    let study_path = extraction_root.join(study_name.as_str());
    archive.extract(&zip_file_path, &study_path)?;

    if !study_handle.is_valid_study(&study_path) {
        return Err(Error::expected(
            ErrorCode::preparation("invalid_study"),
            format!("{} is not a valid study (missing input/output/study.antares)", study_path.display()),
        ));
    }

    let output_dir = study_handle.create_output_collection_folder(&study_path)?;
    let workload: Vec<YearIndex> = study_handle.get_active_playlist_years(&study_path)?;

    let study = StudyRef::new(study_name, study_path, output_dir);
    Ok(Job::new(submitter, priority, zip_file_path, study, workload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_submission(dir: &tempfile::TempDir, zip_name: &str, study_name: &str) -> JobSubmission {
        let zip_path = dir.path().join(zip_name);
        std::fs::write(&zip_path, b"fake zip").unwrap();
        JobSubmission {
            priority: 50,
            submitter: "alice".to_owned(),
            zip_file_path: zip_path,
            study_name: study_name.to_owned(),
        }
    }

    #[test]
    fn validate_rejects_out_of_range_priority() {
        let dir = tempdir().unwrap();
        let mut submission = sample_submission(&dir, "a.zip", "a");
        submission.priority = 0;
        assert!(validate_job_parameters(&submission, dir.path()).is_err());
    }

    #[test]
    fn validate_rejects_empty_submitter() {
        let dir = tempdir().unwrap();
        let mut submission = sample_submission(&dir, "a.zip", "a");
        submission.submitter = "   ".to_owned();
        assert!(validate_job_parameters(&submission, dir.path()).is_err());
    }

    #[test]
    fn validate_rejects_missing_zip() {
        let dir = tempdir().unwrap();
        let mut submission = sample_submission(&dir, "a.zip", "a");
        submission.zip_file_path = dir.path().join("missing.zip");
        assert!(validate_job_parameters(&submission, dir.path()).is_err());
    }

    #[test]
    fn validate_rejects_already_extracted_target() {
        let dir = tempdir().unwrap();
        let submission = sample_submission(&dir, "a.zip", "a");
        std::fs::create_dir_all(dir.path().join("a")).unwrap();
        assert!(validate_job_parameters(&submission, dir.path()).is_err());
    }

    #[test]
    fn validate_accepts_well_formed_submission() {
        let dir = tempdir().unwrap();
        let submission = sample_submission(&dir, "a.zip", "a");
        assert!(validate_job_parameters(&submission, dir.path()).is_ok());
    }
}
