//! A slice of a job assigned to one worker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::primitives::{JobId, TaskId, WorkerName, YearIndex};
use crate::states::TaskStatus;

/// A unit of work handed to a single worker: a subset of a job's year
/// indices, plus the bookkeeping needed to report completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    job_id: JobId,
    worker: WorkerName,
    created_at: DateTime<Utc>,
    status: TaskStatus,
    workload: Vec<YearIndex>,
}

impl Task {
    /// Create a new task in the `RUNNING` state.
    #[must_use]
    pub fn new(job_id: JobId, worker: WorkerName, created_at: DateTime<Utc>, workload: Vec<YearIndex>) -> Self {
        Self {
            id: TaskId::new(),
            job_id,
            worker,
            created_at,
            status: TaskStatus::Running,
            workload,
        }
    }

    /// This task's identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// The job this task was spawned from.
    #[must_use]
    pub const fn job_id(&self) -> JobId {
        self.job_id
    }

    /// The worker this task was assigned to.
    #[must_use]
    pub fn worker(&self) -> &WorkerName {
        &self.worker
    }

    /// When this task was created.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// The year indices assigned to this task.
    #[must_use]
    pub fn workload(&self) -> &[YearIndex] {
        &self.workload
    }

    /// Mark this task as completed or failed. Idempotent calls with the
    /// same terminal status are accepted; changing an already-terminal
    /// task to a different terminal status is rejected by the caller
    /// (see `winjobs-app::queue`), not here.
    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_task_starts_running() {
        let task = Task::new(JobId::new(), WorkerName::parse("w1").unwrap(), Utc::now(), vec![2020, 2021]);
        assert_eq!(task.status(), TaskStatus::Running);
        assert_eq!(task.workload(), &[2020, 2021]);
    }

    #[test]
    fn set_status_transitions_to_terminal() {
        let mut task = Task::new(JobId::new(), WorkerName::parse("w1").unwrap(), Utc::now(), vec![2020]);
        task.set_status(TaskStatus::Completed);
        assert!(task.status().is_terminal());
    }
}
