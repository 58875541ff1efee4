//! # winjobs-test-utils
//!
//! In-memory test doubles for `winjobs-ports` boundary contracts, shared
//! across crate test suites and integration tests so each crate doesn't
//! redefine its own `NoopLogger`/`InMemoryStore` pair.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use winjobs_domain::YearIndex;
use winjobs_ports::queue_store::{PersistedQueueState, QueueStorePort};
use winjobs_ports::{ArchivePort, LogEvent, LoggerPort, OutputStitchPort};
use winjobs_shared::Result;

/// A `QueueStorePort` backed by an in-process `Mutex`, for tests that
/// exercise `JobQueue::load`/persist round trips without touching disk.
#[derive(Default)]
pub struct InMemoryQueueStore {
    state: Mutex<Option<PersistedQueueState>>,
}

impl QueueStorePort for InMemoryQueueStore {
    fn save(&self, state: &PersistedQueueState) -> Result<()> {
        *self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = Some(state.clone());
        Ok(())
    }

    fn load(&self) -> Result<Option<PersistedQueueState>> {
        Ok(self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner).clone())
    }
}

/// A `LoggerPort` that records every event in memory instead of emitting
/// it, so assertions can inspect what was logged.
#[derive(Default)]
pub struct RecordingLogger {
    events: Mutex<Vec<LogEvent>>,
}

impl RecordingLogger {
    /// Snapshot of every event logged so far, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().unwrap_or_else(std::sync::PoisonError::into_inner).clone()
    }

    /// True if any recorded event has the given stable name.
    #[must_use]
    pub fn has_event(&self, event: &str) -> bool {
        self.events().iter().any(|recorded| recorded.event == event)
    }
}

impl LoggerPort for RecordingLogger {
    fn log(&self, event: LogEvent) {
        self.events.lock().unwrap_or_else(std::sync::PoisonError::into_inner).push(event);
    }
}

/// An `OutputStitchPort` that records calls instead of creating symlinks,
/// for tests that only care whether stitching was invoked and with what
/// arguments.
#[derive(Default)]
pub struct RecordingStitcher {
    calls: Mutex<Vec<(PathBuf, PathBuf, Vec<YearIndex>)>>,
}

impl RecordingStitcher {
    /// Every `stitch` call recorded so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<(PathBuf, PathBuf, Vec<YearIndex>)> {
        self.calls.lock().unwrap_or_else(std::sync::PoisonError::into_inner).clone()
    }
}

impl OutputStitchPort for RecordingStitcher {
    fn stitch(&self, output_dir: &Path, worker_output_path: &Path, years: &[YearIndex]) {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push((output_dir.to_path_buf(), worker_output_path.to_path_buf(), years.to_vec()));
    }
}

/// An `ArchivePort` that performs no real zip I/O: `extract` creates an
/// empty destination directory, `archive_excluding_output` writes a
/// placeholder file, and both record their calls.
#[derive(Default)]
pub struct InMemoryArchive {
    extract_calls: Mutex<Vec<(PathBuf, PathBuf)>>,
    archive_calls: Mutex<Vec<(PathBuf, PathBuf)>>,
}

impl InMemoryArchive {
    /// Every `extract` call recorded so far.
    #[must_use]
    pub fn extract_calls(&self) -> Vec<(PathBuf, PathBuf)> {
        self.extract_calls.lock().unwrap_or_else(std::sync::PoisonError::into_inner).clone()
    }

    /// Every `archive_excluding_output` call recorded so far.
    #[must_use]
    pub fn archive_calls(&self) -> Vec<(PathBuf, PathBuf)> {
        self.archive_calls.lock().unwrap_or_else(std::sync::PoisonError::into_inner).clone()
    }
}

impl ArchivePort for InMemoryArchive {
    fn extract(&self, zip_path: &Path, destination_dir: &Path) -> Result<()> {
        self.extract_calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push((zip_path.to_path_buf(), destination_dir.to_path_buf()));
        std::fs::create_dir_all(destination_dir)?;
        Ok(())
    }

    fn archive_excluding_output(&self, source_dir: &Path, zip_path: &Path) -> Result<()> {
        self.archive_calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push((source_dir.to_path_buf(), zip_path.to_path_buf()));
        if let Some(parent) = zip_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(zip_path, b"fake zip")?;
        Ok(())
    }
}

/// A fixed-content INI-less `StudyHandlePort`-style fixture describing a
/// valid study with a known playlist, for tests that don't need real
/// filesystem/INI behavior (`winjobs-adapters::FsAntaresStudy` is used
/// directly wherever INI semantics matter).
#[derive(Debug, Clone, Default)]
pub struct FixedPlaylist(pub BTreeMap<PathBuf, Vec<YearIndex>>);

impl FixedPlaylist {
    /// Register a fixed playlist for a given study path.
    pub fn insert(&mut self, study_path: impl Into<PathBuf>, years: Vec<YearIndex>) {
        self.0.insert(study_path.into(), years);
    }
}

/// Returns the test-utils crate version.
#[must_use]
pub const fn test_utils_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use winjobs_ports::LogFields;

    #[test]
    fn recording_logger_captures_events() {
        let logger = RecordingLogger::default();
        logger.info("test_event", "hello", LogFields::new());
        assert!(logger.has_event("test_event"));
        assert_eq!(logger.events().len(), 1);
    }

    #[test]
    fn in_memory_queue_store_round_trips() {
        let store = InMemoryQueueStore::default();
        assert!(store.load().unwrap().is_none());
        store
            .save(&PersistedQueueState {
                pending: Vec::new(),
                finished: Vec::new(),
                sequence_high_water_mark: 3,
            })
            .unwrap();
        assert_eq!(store.load().unwrap().unwrap().sequence_high_water_mark, 3);
    }

    #[test]
    fn in_memory_archive_extract_creates_destination() {
        let archive = InMemoryArchive::default();
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("extracted");
        archive.extract(Path::new("/nonexistent.zip"), &destination).unwrap();
        assert!(destination.is_dir());
        assert_eq!(archive.extract_calls().len(), 1);
    }
}
