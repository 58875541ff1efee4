//! Queue persistence boundary contract (spec.md §4.4, §6).
//!
//! The persisted format is self-describing JSON rather than the original's
//! opaque pickle (§9 design note), but the contract here stays adapter-
//! agnostic: `winjobs-app` depends only on this trait, never on the concrete
//! file layout.

use serde::{Deserialize, Serialize};
use winjobs_domain::{Job, Priority, Sequence};
use winjobs_shared::Result;

/// One entry of the persisted pending collection: `(priority, sequence, job)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedPendingJob {
    /// Scheduling priority at enqueue time.
    pub priority: Priority,
    /// Enqueue-order sequence number.
    pub sequence: Sequence,
    /// The job itself, including its spawned tasks.
    pub job: Job,
}

/// One entry of the persisted finished collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedFinishedJob {
    /// The completed job.
    pub job: Job,
}

/// The full on-disk snapshot of a `JobQueue`: both collections and the
/// process-wide sequence counter (§3: "on reload it resumes from the
/// persisted high-water mark + 1").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersistedQueueState {
    /// Pending jobs, in the order they were persisted (priority/sequence
    /// ordering is reconstructed by the loader, not implied by this vec).
    pub pending: Vec<PersistedPendingJob>,
    /// Finished jobs.
    pub finished: Vec<PersistedFinishedJob>,
    /// The highest sequence number handed out so far.
    pub sequence_high_water_mark: Sequence,
}

/// Boundary contract for mirroring `JobQueue` state to durable storage.
pub trait QueueStorePort: Send + Sync {
    /// Atomically persist the full queue snapshot. Errors here are fatal
    /// for the calling mutation (§4.4 "Failure semantics").
    fn save(&self, state: &PersistedQueueState) -> Result<()>;

    /// Load the persisted snapshot, if any file has ever been written.
    fn load(&self) -> Result<Option<PersistedQueueState>>;
}
