//! Value object describing an extracted study on disk.
//!
//! `StudyRef` is pure data: the paths a job's study occupies. Filesystem
//! behavior (extraction, playlist parsing, symlink stitching) lives behind
//! `winjobs-ports::StudyHandlePort`, implemented by `winjobs-adapters`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::primitives::StudyName;

/// Handle to an extracted Antares study folder and its per-run output
/// collection folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyRef {
    /// Name of the study, shared with the extraction folder name.
    pub study_name: StudyName,
    /// Absolute path to the extracted study folder.
    pub study_path: PathBuf,
    /// Absolute path to the per-run output collection folder
    /// (`economy/mc-ind` is stitched into this folder per year).
    pub output_dir: PathBuf,
}

impl StudyRef {
    /// Construct a new study reference.
    #[must_use]
    pub const fn new(study_name: StudyName, study_path: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            study_name,
            study_path,
            output_dir,
        }
    }
}
