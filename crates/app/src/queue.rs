//! The prioritized, persistent job queue (spec.md §3, §4.4).

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use winjobs_domain::{Job, JobDisposition, JobId, Priority, Sequence, Task, TaskId, TaskStatus, WorkerName, YearIndex};
use winjobs_ports::queue_store::{PersistedFinishedJob, PersistedPendingJob, PersistedQueueState, QueueStorePort};
use winjobs_ports::{LogFields, LoggerPort, OutputStitchPort};
use winjobs_shared::{Error, ErrorCode, Result};

/// Request body for `finish_task` (spec.md §4.1, §6).
#[derive(Debug, Clone)]
pub struct FinishTaskRequest {
    /// The task being reported on.
    pub task_id: TaskId,
    /// The parent job's id.
    pub job_id: JobId,
    /// Year indices the worker ran.
    pub workload: Vec<YearIndex>,
    /// Path to the worker's per-year output folders.
    pub output_path: PathBuf,
    /// Whether the solver run succeeded.
    pub success: bool,
}

/// One entry of a queue snapshot, for `/jobs_overview` and
/// `/job_details/{id}`.
#[derive(Debug, Clone)]
pub struct JobSnapshot {
    /// The job itself.
    pub job: Job,
    /// Whether it is currently queued or finished.
    pub disposition: JobDisposition,
    /// Enqueue-order sequence number, only meaningful while queued.
    pub sequence: Option<Sequence>,
}

struct QueueState {
    pending: BTreeMap<(Priority, Sequence), Job>,
    finished: Vec<Job>,
    next_sequence: Sequence,
}

impl QueueState {
    fn empty() -> Self {
        Self {
            pending: BTreeMap::new(),
            finished: Vec::new(),
            next_sequence: 0,
        }
    }
}

/// Owns the pending and finished job collections under a single mutex
/// (spec.md §4.4, §5: "the queue mutex must cover both collections *and*
/// per-Job task lists").
pub struct JobQueue {
    state: Mutex<QueueState>,
    store: Arc<dyn QueueStorePort>,
    logger: Arc<dyn LoggerPort>,
    stitcher: Arc<dyn OutputStitchPort>,
}

impl JobQueue {
    /// Construct a queue backed by `store`, loading and reconciling any
    /// persisted snapshot (spec.md §4.4 "Persistence model").
    pub fn load(
        store: Arc<dyn QueueStorePort>,
        logger: Arc<dyn LoggerPort>,
        stitcher: Arc<dyn OutputStitchPort>,
    ) -> Result<Self> {
        let mut state = QueueState::empty();

        if let Some(persisted) = store.load()? {
            state.next_sequence = persisted.sequence_high_water_mark;

            for entry in persisted.pending {
                if job_backing_files_exist(&entry.job) {
                    state.pending.insert((entry.priority, entry.sequence), entry.job);
                } else {
                    let mut fields = LogFields::new();
                    fields.insert("job_id", entry.job.id().to_string());
                    logger.warn("reconcile_drop_pending", "dropping pending job with missing backing files", fields);
                }
            }

            for entry in persisted.finished {
                if job_backing_files_exist(&entry.job) {
                    state.finished.push(entry.job);
                } else {
                    let mut fields = LogFields::new();
                    fields.insert("job_id", entry.job.id().to_string());
                    logger.warn("reconcile_drop_finished", "dropping finished job with missing backing files", fields);
                }
            }
        }

        Ok(Self {
            state: Mutex::new(state),
            store,
            logger,
            stitcher,
        })
    }

    fn persist(&self, state: &QueueState) -> Result<()> {
        let pending = state
            .pending
            .iter()
            .map(|((priority, sequence), job)| PersistedPendingJob {
                priority: *priority,
                sequence: *sequence,
                job: job.clone(),
            })
            .collect();
        let finished = state
            .finished
            .iter()
            .map(|job| PersistedFinishedJob { job: job.clone() })
            .collect();
        self.store.save(&PersistedQueueState {
            pending,
            finished,
            sequence_high_water_mark: state.next_sequence,
        })
    }

    /// Enqueue a newly prepared job (spec.md §4.4 `add_job`).
    pub fn add_job(&self, job: Job) -> Result<()> {
        let mut state = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let sequence = state.next_sequence;
        state.next_sequence += 1;
        state.pending.insert((job.priority(), sequence), job);
        self.persist(&state)
    }

    /// Assign up to `amount` year indices from the highest-priority job
    /// with remaining workload (spec.md §4.4 `assign_task`).
    ///
    /// Among jobs of equal priority, a job that still has remaining
    /// workload after this assignment is re-keyed behind its peers under a
    /// fresh sequence number, so repeated calls rotate round-robin across
    /// same-priority jobs instead of draining one to exhaustion first
    /// (spec.md §3 invariant 4, §8 S3).
    pub fn assign_task(&self, worker: WorkerName, amount: usize, now: DateTime<Utc>) -> Result<Option<Task>> {
        let mut state = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        let target_key = state
            .pending
            .iter()
            .find(|(_, job)| !job.remaining_workload().is_empty())
            .map(|(key, _)| *key);

        let Some(key) = target_key else {
            return Ok(None);
        };

        let mut job = state.pending.remove(&key).ok_or_else(|| {
            Error::invariant(ErrorCode::internal(), "target job vanished between lookup and assignment")
        })?;

        let mut remaining = job.remaining_workload();
        remaining.truncate(amount);

        let task = Task::new(job.id(), worker, now, remaining);
        job.add_task(task.clone())?;

        let reinsert_key = if job.remaining_workload().is_empty() {
            key
        } else {
            let sequence = state.next_sequence;
            state.next_sequence += 1;
            (key.0, sequence)
        };
        state.pending.insert(reinsert_key, job);

        self.persist(&state)?;
        Ok(Some(task))
    }

    /// Record a worker's report on a task (spec.md §4.4 `finish_task`).
    ///
    /// Idempotent: if the task has already reached a terminal state, this
    /// is a no-op aside from a log line (§8 "Idempotence law").
    pub fn finish_task(&self, request: FinishTaskRequest) -> Result<()> {
        let mut state = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        let Some(key) = find_pending_key(&state.pending, request.job_id) else {
            let mut fields = LogFields::new();
            fields.insert("job_id", request.job_id.to_string());
            self.logger.error("finish_task_unknown_job", "finish_task referenced an unknown job id", fields);
            return Ok(());
        };

        let job = state.pending.get_mut(&key).ok_or_else(|| {
            Error::invariant(ErrorCode::internal(), "target job vanished between lookup and finish")
        })?;

        let already_terminal = job
            .tasks()
            .iter()
            .find(|task| task.id() == request.task_id)
            .is_some_and(|task| task.status().is_terminal());

        if already_terminal {
            let mut fields = LogFields::new();
            fields.insert("task_id", request.task_id.to_string());
            self.logger.info("finish_task_idempotent_noop", "task already terminal, ignoring duplicate report", fields);
            return Ok(());
        }

        let status = if request.success { TaskStatus::Completed } else { TaskStatus::Failed };
        job.finish_task(request.task_id, status)?;

        if request.success {
            let output_dir = job.study().output_dir.clone();
            self.stitcher.stitch(&output_dir, &request.output_path, &request.workload);
        }

        let is_complete = job.is_complete();

        if is_complete {
            if let Some(finished_job) = state.pending.remove(&key) {
                state.finished.push(finished_job);
            }
        }

        self.persist(&state)
    }

    /// Linear search for a job by id across both collections (spec.md
    /// §4.4 `get_job_by_id`).
    #[must_use]
    pub fn get_job_by_id(&self, job_id: JobId) -> Option<JobSnapshot> {
        let state = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        if let Some((&(_, sequence), job)) = state.pending.iter().find(|(_, job)| job.id() == job_id) {
            return Some(JobSnapshot {
                job: job.clone(),
                disposition: JobDisposition::Queued,
                sequence: Some(sequence),
            });
        }

        state.finished.iter().find(|job| job.id() == job_id).map(|job| JobSnapshot {
            job: job.clone(),
            disposition: JobDisposition::Finished,
            sequence: None,
        })
    }

    /// Number of pending jobs (spec.md §4.4 `get_queue_length`).
    #[must_use]
    pub fn get_queue_length(&self) -> usize {
        let state = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        state.pending.len()
    }

    /// Snapshot every known job, queued then finished, for
    /// `/jobs_overview` (spec.md §4.1).
    #[must_use]
    pub fn jobs_overview(&self) -> Vec<JobSnapshot> {
        let state = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        let mut snapshots: Vec<JobSnapshot> = state
            .pending
            .iter()
            .map(|(&(_, sequence), job)| JobSnapshot {
                job: job.clone(),
                disposition: JobDisposition::Queued,
                sequence: Some(sequence),
            })
            .collect();

        snapshots.extend(state.finished.iter().map(|job| JobSnapshot {
            job: job.clone(),
            disposition: JobDisposition::Finished,
            sequence: None,
        }));

        snapshots
    }
}

fn find_pending_key(pending: &BTreeMap<(Priority, Sequence), Job>, job_id: JobId) -> Option<(Priority, Sequence)> {
    pending.iter().find(|(_, job)| job.id() == job_id).map(|(key, _)| *key)
}

fn job_backing_files_exist(job: &Job) -> bool {
    job.zip_file_path().exists() && job.study().study_path.exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex as StdMutex;
    use tempfile::tempdir;
    use winjobs_domain::{StudyName, StudyRef, SubmitterId};

    #[derive(Default)]
    struct InMemoryStore {
        state: StdMutex<Option<PersistedQueueState>>,
    }

    impl QueueStorePort for InMemoryStore {
        fn save(&self, state: &PersistedQueueState) -> Result<()> {
            *self.state.lock().unwrap() = Some(state.clone());
            Ok(())
        }

        fn load(&self) -> Result<Option<PersistedQueueState>> {
            Ok(self.state.lock().unwrap().clone())
        }
    }

    #[derive(Default)]
    struct NoopLogger;
    impl LoggerPort for NoopLogger {
        fn log(&self, _event: winjobs_ports::LogEvent) {}
    }

    #[derive(Default)]
    struct NoopStitcher;
    impl OutputStitchPort for NoopStitcher {
        fn stitch(&self, _output_dir: &Path, _worker_output_path: &Path, _years: &[YearIndex]) {}
    }

    fn build_queue() -> JobQueue {
        JobQueue::load(Arc::new(InMemoryStore::default()), Arc::new(NoopLogger), Arc::new(NoopStitcher)).unwrap()
    }

    fn sample_job(dir: &tempfile::TempDir, name: &str, priority: u8, workload: Vec<YearIndex>) -> Job {
        let study_path = dir.path().join(name);
        std::fs::create_dir_all(&study_path).unwrap();
        let zip_path = dir.path().join(format!("{name}.zip"));
        std::fs::write(&zip_path, b"fake zip").unwrap();

        Job::new(
            SubmitterId::parse("alice").unwrap(),
            Priority::parse(i64::from(priority)).unwrap(),
            zip_path,
            StudyRef::new(StudyName::parse(name).unwrap(), study_path.clone(), study_path.join("output")),
            workload,
        )
    }

    #[test]
    fn assign_task_returns_full_workload_when_amount_covers_it() {
        let dir = tempdir().unwrap();
        let queue = build_queue();
        queue.add_job(sample_job(&dir, "alpha", 50, vec![0, 1, 2, 3])).unwrap();

        let task = queue
            .assign_task(WorkerName::parse("w1").unwrap(), 10, Utc::now())
            .unwrap()
            .unwrap();
        assert_eq!(task.workload(), &[0, 1, 2, 3]);
    }

    #[test]
    fn assign_task_prefers_higher_priority_job() {
        let dir = tempdir().unwrap();
        let queue = build_queue();
        queue.add_job(sample_job(&dir, "low", 80, vec![0])).unwrap();
        queue.add_job(sample_job(&dir, "high", 20, vec![1])).unwrap();

        let task = queue
            .assign_task(WorkerName::parse("w1").unwrap(), 10, Utc::now())
            .unwrap()
            .unwrap();
        assert_eq!(task.workload(), &[1]);
    }

    #[test]
    fn round_robin_among_equal_priority_jobs() {
        let dir = tempdir().unwrap();
        let queue = build_queue();
        queue.add_job(sample_job(&dir, "a", 50, vec![0, 1])).unwrap();
        queue.add_job(sample_job(&dir, "b", 50, vec![0, 1])).unwrap();

        let worker = WorkerName::parse("w1").unwrap();
        let first = queue.assign_task(worker.clone(), 1, Utc::now()).unwrap().unwrap();
        let second = queue.assign_task(worker.clone(), 1, Utc::now()).unwrap().unwrap();
        let third = queue.assign_task(worker.clone(), 1, Utc::now()).unwrap().unwrap();
        let fourth = queue.assign_task(worker, 1, Utc::now()).unwrap().unwrap();

        assert_ne!(first.job_id(), second.job_id());
        assert_eq!(first.job_id(), third.job_id());
        assert_eq!(second.job_id(), fourth.job_id());
    }

    #[test]
    fn finish_task_moves_completed_job_to_finished() {
        let dir = tempdir().unwrap();
        let queue = build_queue();
        queue.add_job(sample_job(&dir, "alpha", 50, vec![0, 1, 2, 3])).unwrap();

        let task = queue
            .assign_task(WorkerName::parse("w1").unwrap(), 10, Utc::now())
            .unwrap()
            .unwrap();

        queue
            .finish_task(FinishTaskRequest {
                task_id: task.id(),
                job_id: task.job_id(),
                workload: task.workload().to_vec(),
                output_path: PathBuf::from("/tmp/nonexistent"),
                success: true,
            })
            .unwrap();

        assert_eq!(queue.get_queue_length(), 0);
        let snapshot = queue.get_job_by_id(task.job_id()).unwrap();
        assert_eq!(snapshot.disposition, JobDisposition::Finished);
        assert_eq!(snapshot.job.percentage_complete(), 100);
    }

    #[test]
    fn finish_task_is_idempotent_on_duplicate_report() {
        let dir = tempdir().unwrap();
        let queue = build_queue();
        queue.add_job(sample_job(&dir, "alpha", 50, vec![0, 1])).unwrap();
        let task = queue
            .assign_task(WorkerName::parse("w1").unwrap(), 1, Utc::now())
            .unwrap()
            .unwrap();

        let request = FinishTaskRequest {
            task_id: task.id(),
            job_id: task.job_id(),
            workload: task.workload().to_vec(),
            output_path: PathBuf::from("/tmp/nonexistent"),
            success: true,
        };
        queue.finish_task(request.clone()).unwrap();
        queue.finish_task(request).unwrap();

        let snapshot = queue.get_job_by_id(task.job_id()).unwrap();
        assert_eq!(snapshot.job.percentage_complete(), 50);
    }

    #[test]
    fn finish_task_on_unknown_job_is_a_logged_noop() {
        let queue = build_queue();
        let result = queue.finish_task(FinishTaskRequest {
            task_id: TaskId::new(),
            job_id: JobId::new(),
            workload: vec![0],
            output_path: PathBuf::from("/tmp/nonexistent"),
            success: true,
        });
        assert!(result.is_ok());
    }

    #[test]
    fn reload_drops_jobs_with_missing_backing_files() {
        let dir = tempdir().unwrap();
        let store = Arc::new(InMemoryStore::default());
        let logger = Arc::new(NoopLogger);
        let stitcher: Arc<dyn OutputStitchPort> = Arc::new(NoopStitcher);

        {
            let queue = JobQueue::load(store.clone(), logger.clone(), stitcher.clone()).unwrap();
            queue.add_job(sample_job(&dir, "keep", 50, vec![0])).unwrap();
            queue.add_job(sample_job(&dir, "drop", 50, vec![0])).unwrap();
        }

        std::fs::remove_dir_all(dir.path().join("drop")).unwrap();

        let reloaded = JobQueue::load(store, logger, stitcher).unwrap();
        assert_eq!(reloaded.get_queue_length(), 1);
    }
}
