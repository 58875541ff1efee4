//! JSON-file implementation of `QueueStorePort` (spec.md §9 redesign note:
//! self-describing JSON replaces the original's opaque pickle format).

use std::path::{Path, PathBuf};

use winjobs_ports::queue_store::{PersistedQueueState, QueueStorePort};
use winjobs_shared::{Error, ErrorClass, ErrorCode, Result};

/// Persists a `PersistedQueueState` snapshot to a single JSON file, written
/// via a temp-file-then-rename so a crash mid-write never leaves a
/// truncated file behind.
#[derive(Debug, Clone)]
pub struct JsonQueueStore {
    path: PathBuf,
}

impl JsonQueueStore {
    /// Create a store backed by the file at `path` (typically `queue.json`).
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl QueueStorePort for JsonQueueStore {
    fn save(&self, state: &PersistedQueueState) -> Result<()> {
        let json = serde_json::to_vec_pretty(state).map_err(|error| {
            Error::unexpected(ErrorCode::persistence("serialize"), error.to_string(), ErrorClass::NonRetriable)
        })?;

        let tmp_path = tmp_path_for(&self.path);
        std::fs::write(&tmp_path, json).map_err(Error::from)?;
        std::fs::rename(&tmp_path, &self.path).map_err(Error::from)?;
        Ok(())
    }

    fn load(&self) -> Result<Option<PersistedQueueState>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let bytes = std::fs::read(&self.path).map_err(Error::from)?;
        let state = serde_json::from_slice(&bytes).map_err(|error| {
            Error::unexpected(ErrorCode::persistence("deserialize"), error.to_string(), ErrorClass::NonRetriable)
        })?;
        Ok(Some(state))
    }
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use winjobs_ports::queue_store::PersistedFinishedJob;

    #[test]
    fn load_returns_none_when_file_absent() {
        let dir = tempdir().unwrap();
        let store = JsonQueueStore::new(dir.path().join("queue.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = JsonQueueStore::new(dir.path().join("queue.json"));
        let state = PersistedQueueState {
            pending: Vec::new(),
            finished: Vec::<PersistedFinishedJob>::new(),
            sequence_high_water_mark: 42,
        };
        store.save(&state).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.sequence_high_water_mark, 42);
        assert!(loaded.pending.is_empty());
    }

    #[test]
    fn save_overwrites_previous_snapshot() {
        let dir = tempdir().unwrap();
        let store = JsonQueueStore::new(dir.path().join("queue.json"));
        store
            .save(&PersistedQueueState {
                pending: Vec::new(),
                finished: Vec::new(),
                sequence_high_water_mark: 1,
            })
            .unwrap();
        store
            .save(&PersistedQueueState {
                pending: Vec::new(),
                finished: Vec::new(),
                sequence_high_water_mark: 2,
            })
            .unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.sequence_high_water_mark, 2);
    }
}
