//! State-machine enums governing task and job lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a task assigned to a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// The worker has not yet reported a result.
    Running,
    /// The worker reported success for every year in the task's workload.
    Completed,
    /// The worker reported failure; the task's years count toward
    /// completion accounting but not toward successful output.
    Failed,
}

impl TaskStatus {
    /// True once the task has reached a terminal state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => formatter.write_str("RUNNING"),
            Self::Completed => formatter.write_str("COMPLETED"),
            Self::Failed => formatter.write_str("FAILED"),
        }
    }
}

/// Which collection currently owns a job: the pending queue or the
/// finished archive. A job is in exactly one of these at all times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobDisposition {
    /// Still queued, awaiting or undergoing task assignment.
    Queued,
    /// Reached 100% completion and moved to the finished archive.
    Finished,
}

impl fmt::Display for JobDisposition {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queued => formatter.write_str("queued"),
            Self::Finished => formatter.write_str("finished"),
        }
    }
}
