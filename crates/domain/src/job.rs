//! The accepted unit of work and the invariants governing its tasks.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use winjobs_shared::{Error, ErrorCode};

use crate::primitives::{JobId, Priority, SubmitterId, TaskId, WorkerName, YearIndex};
use crate::states::TaskStatus;
use crate::study::StudyRef;
use crate::task::Task;

/// Invariant violations raised while mutating a [`Job`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobError {
    /// A task's workload overlaps with an already-claimed (non-failed)
    /// year index of the same job.
    WorkloadOverlap {
        /// The overlapping year indices.
        years: Vec<YearIndex>,
    },
    /// A task's workload contains a year not present in the job's
    /// playlist-derived workload.
    WorkloadNotInJob {
        /// The offending year indices.
        years: Vec<YearIndex>,
    },
    /// `finish_task` referenced a task id this job does not own.
    UnknownTask {
        /// The task id that was not found.
        task_id: TaskId,
    },
}

impl std::fmt::Display for JobError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WorkloadOverlap { years } => {
                write!(formatter, "years {years:?} are already assigned to a non-failed task")
            },
            Self::WorkloadNotInJob { years } => {
                write!(formatter, "years {years:?} are not part of this job's workload")
            },
            Self::UnknownTask { task_id } => write!(formatter, "task {task_id} does not belong to this job"),
        }
    }
}

impl std::error::Error for JobError {}

impl From<JobError> for Error {
    fn from(error: JobError) -> Self {
        Self::invariant(ErrorCode::new("domain", "job_invariant"), error.to_string())
    }
}

/// An accepted unit of work, tracking the tasks spawned to solve it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    id: JobId,
    submitter: SubmitterId,
    priority: Priority,
    zip_file_path: PathBuf,
    study: StudyRef,
    workload: Vec<YearIndex>,
    tasks: Vec<Task>,
}

impl Job {
    /// Create a newly accepted job with no tasks yet.
    #[must_use]
    pub fn new(
        submitter: SubmitterId,
        priority: Priority,
        zip_file_path: PathBuf,
        study: StudyRef,
        workload: Vec<YearIndex>,
    ) -> Self {
        Self {
            id: JobId::new(),
            submitter,
            priority,
            zip_file_path,
            study,
            workload,
            tasks: Vec::new(),
        }
    }

    /// This job's identifier.
    #[must_use]
    pub const fn id(&self) -> JobId {
        self.id
    }

    /// Who submitted this job.
    #[must_use]
    pub fn submitter(&self) -> &SubmitterId {
        &self.submitter
    }

    /// Scheduling priority; lower is more urgent.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Path to the originally uploaded archive.
    #[must_use]
    pub fn zip_file_path(&self) -> &std::path::Path {
        &self.zip_file_path
    }

    /// Handle to the extracted study and its output folder.
    #[must_use]
    pub const fn study(&self) -> &StudyRef {
        &self.study
    }

    /// Full set of year indices this job must solve.
    #[must_use]
    pub fn workload(&self) -> &[YearIndex] {
        &self.workload
    }

    /// Tasks spawned from this job so far, oldest first.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Year indices not yet present in any prior task, regardless of that
    /// task's status. A failed task's years are not retried — they are
    /// already "present in a prior task" per spec and simply count toward
    /// `percentage_complete` without producing output.
    #[must_use]
    pub fn remaining_workload(&self) -> Vec<YearIndex> {
        let claimed: HashSet<YearIndex> = self
            .tasks
            .iter()
            .flat_map(|task| task.workload().iter().copied())
            .collect();

        self.workload
            .iter()
            .copied()
            .filter(|year| !claimed.contains(year))
            .collect()
    }

    /// Percentage of the job's workload covered by a terminal task,
    /// `floor(100 * completed_or_failed_years / total_years)`.
    #[must_use]
    pub fn percentage_complete(&self) -> u32 {
        if self.workload.is_empty() {
            return 100;
        }

        let terminal_years: usize = self
            .tasks
            .iter()
            .filter(|task| task.status().is_terminal())
            .map(|task| task.workload().len())
            .sum();

        #[allow(clippy::cast_possible_truncation)]
        let percentage = (100 * terminal_years / self.workload.len()) as u32;
        percentage.min(100)
    }

    /// True once every year in the workload is covered by a terminal task.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.percentage_complete() >= 100
    }

    /// Append a newly assigned task, enforcing the no-overlap invariant.
    pub fn add_task(&mut self, task: Task) -> Result<(), JobError> {
        let workload_set: HashSet<YearIndex> = self.workload.iter().copied().collect();
        let not_in_job: Vec<YearIndex> = task
            .workload()
            .iter()
            .copied()
            .filter(|year| !workload_set.contains(year))
            .collect();
        if !not_in_job.is_empty() {
            return Err(JobError::WorkloadNotInJob { years: not_in_job });
        }

        let remaining: HashSet<YearIndex> = self.remaining_workload().into_iter().collect();
        let overlap: Vec<YearIndex> = task
            .workload()
            .iter()
            .copied()
            .filter(|year| !remaining.contains(year))
            .collect();
        if !overlap.is_empty() {
            return Err(JobError::WorkloadOverlap { years: overlap });
        }

        self.tasks.push(task);
        Ok(())
    }

    /// Update a task's terminal status by id.
    pub fn finish_task(&mut self, task_id: TaskId, status: TaskStatus) -> Result<(), JobError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id() == task_id)
            .ok_or(JobError::UnknownTask { task_id })?;
        task.set_status(status);
        Ok(())
    }

    /// Tasks currently assigned to a worker, for fairness accounting.
    #[must_use]
    pub fn tasks_for_worker(&self, worker: &WorkerName) -> Vec<&Task> {
        self.tasks.iter().filter(|task| task.worker() == worker).collect()
    }
}
