//! API v1 DTO types for the driver HTTP surface (spec.md §4.1, §6).

use serde::{Deserialize, Serialize};

/// `GET /health` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self { status: "ok".to_owned() }
    }
}

/// `POST /submit_job` success response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitJobResponse {
    /// The newly assigned job id, rendered as text.
    pub job_id: String,
    /// Number of year indices in the job's workload.
    pub workload_length: usize,
    /// Pending-queue length after this submission.
    pub job_queue_length: usize,
}

/// Business-error body, used for `/submit_job` failures per §4.1 ("not a
/// 4xx — the original behavior uses 200 with error field").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

impl ErrorResponse {
    /// Build an error response from any displayable error.
    pub fn new(message: impl std::fmt::Display) -> Self {
        Self { error: message.to_string() }
    }
}

/// One descriptive entry of `/jobs_overview` or `/job_details/{id}`
/// (spec.md §4.1: "id, submitter, zip path, study name/path, workload
/// length, percentage complete, status, and for queued items priority and
/// sequence counter").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOverviewDto {
    /// The job's id, rendered as text.
    pub id: String,
    /// Who submitted the job.
    pub submitter: String,
    /// Absolute path to the originally uploaded archive.
    pub zip_file_path: String,
    /// The study's name.
    pub study_name: String,
    /// Absolute path to the extracted study folder.
    pub study_path: String,
    /// Number of year indices in the job's workload.
    pub workload_length: usize,
    /// `floor(100 * terminal_years / workload_length)`.
    pub percentage_complete: u32,
    /// `"queued"` or `"finished"`.
    pub status: String,
    /// Scheduling priority; only meaningful while queued.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    /// Enqueue-order sequence number; only meaningful while queued.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u64>,
}

/// `GET /jobs_overview` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct JobsOverviewResponse {
    /// All known jobs, queued and finished.
    pub jobs: Vec<JobOverviewDto>,
}

/// `POST /get_task` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetTaskRequest {
    /// The polling worker's hostname/identity.
    pub worker: String,
    /// Cores this worker determined it can use (spec.md §4.7 step 2).
    pub cores: u32,
}

/// Task record returned by `/get_task` (spec.md §6 "Task record fields").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecordDto {
    /// The new task's id, rendered as text.
    pub id: String,
    /// The parent job's id, rendered as text.
    pub job_id: String,
    /// The parent job's submitter.
    pub submitter: String,
    /// The parent job's priority.
    pub priority: u8,
    /// Absolute path to the parent job's uploaded archive (shared-namespace
    /// reachable by the worker).
    pub zip_file_path: String,
    /// The study's name.
    pub study_name: String,
    /// The worker this task was assigned to.
    pub worker: String,
    /// Year indices assigned to this task.
    pub workload: Vec<u32>,
    /// The parent job's percentage complete at assignment time.
    pub percentage_complete: u32,
}

/// `POST /get_task` response: either an assignment or the no-work sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GetTaskResponse {
    /// A new task was assigned.
    Assigned(TaskRecordDto),
    /// No job currently has remaining workload.
    NoWork {
        /// Always `"No work available at this time."`.
        message: String,
    },
}

impl GetTaskResponse {
    /// The sentinel returned when no job has remaining workload.
    #[must_use]
    pub fn no_work() -> Self {
        Self::NoWork {
            message: "No work available at this time.".to_owned(),
        }
    }
}

/// `POST /task_done` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDoneRequest {
    /// The completed task's id, rendered as text.
    pub task_id: String,
    /// The parent job's id, rendered as text.
    pub job_id: String,
    /// Year indices the worker ran (must match the task's workload).
    pub workload: Vec<u32>,
    /// Path to the worker's per-year output folders (shared-namespace
    /// reachable by the driver).
    pub output_path: String,
    /// Whether the solver run succeeded.
    pub success: bool,
}

/// `POST /task_done` acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDoneResponse {
    /// Always true; spec.md §4.1 notes "no meaningful body".
    pub acknowledged: bool,
}

impl Default for TaskDoneResponse {
    fn default() -> Self {
        Self { acknowledged: true }
    }
}
