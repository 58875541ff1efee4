//! Domain primitives with validated constructors.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use winjobs_shared::{Error, ErrorCode};

/// Validation failures for domain primitives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimitiveError {
    /// `Priority` outside the allowed `[1, 100]` range.
    PriorityOutOfRange {
        /// The rejected value.
        value: i64,
    },
    /// `SubmitterId` is empty after trimming.
    EmptySubmitter,
    /// `WorkerName` is empty after trimming.
    EmptyWorkerName,
    /// `StudyName` is empty after trimming.
    EmptyStudyName,
    /// `JobId` text was not a valid UUID.
    InvalidJobId,
    /// `TaskId` text was not a valid UUID.
    InvalidTaskId,
}

impl fmt::Display for PrimitiveError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PriorityOutOfRange { value } => {
                write!(formatter, "priority {value} is outside the allowed range [1, 100]")
            },
            Self::EmptySubmitter => formatter.write_str("submitter must be non-empty"),
            Self::EmptyWorkerName => formatter.write_str("worker name must be non-empty"),
            Self::EmptyStudyName => formatter.write_str("study name must be non-empty"),
            Self::InvalidJobId => formatter.write_str("job id must be a valid UUID"),
            Self::InvalidTaskId => formatter.write_str("task id must be a valid UUID"),
        }
    }
}

impl std::error::Error for PrimitiveError {}

impl From<PrimitiveError> for Error {
    fn from(error: PrimitiveError) -> Self {
        Self::expected(ErrorCode::validation("primitive"), error.to_string())
    }
}

/// Globally unique job identifier, rendered as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    /// Generate a new random job id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a job id from its textual representation.
    pub fn parse(input: &str) -> Result<Self, PrimitiveError> {
        Uuid::parse_str(input)
            .map(Self)
            .map_err(|_| PrimitiveError::InvalidJobId)
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Globally unique task identifier, rendered as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Generate a new random task id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a task id from its textual representation.
    pub fn parse(input: &str) -> Result<Self, PrimitiveError> {
        Uuid::parse_str(input)
            .map(Self)
            .map_err(|_| PrimitiveError::InvalidTaskId)
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Job priority in `[1, 100]`; lower value means higher priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Priority(u8);

impl Priority {
    /// Minimum accepted value (highest priority).
    pub const MIN: u8 = 1;
    /// Maximum accepted value (lowest priority).
    pub const MAX: u8 = 100;

    /// Parse a priority from a raw integer, validating the `[1, 100]` range.
    pub fn parse(value: i64) -> Result<Self, PrimitiveError> {
        if !(i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            return Err(PrimitiveError::PriorityOutOfRange { value });
        }
        #[allow(clippy::cast_possible_truncation)]
        Ok(Self(value as u8))
    }

    /// The raw value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Non-empty identifier of the entity that submitted a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmitterId(Box<str>);

impl SubmitterId {
    /// Parse a submitter id, rejecting empty (post-trim) input.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, PrimitiveError> {
        let trimmed = trimmed_non_empty(input.as_ref()).ok_or(PrimitiveError::EmptySubmitter)?;
        Ok(Self(trimmed.to_owned().into_boxed_str()))
    }

    /// Access the underlying string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubmitterId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Non-empty name identifying a worker process.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkerName(Box<str>);

impl WorkerName {
    /// Parse a worker name, rejecting empty (post-trim) input.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, PrimitiveError> {
        let trimmed = trimmed_non_empty(input.as_ref()).ok_or(PrimitiveError::EmptyWorkerName)?;
        Ok(Self(trimmed.to_owned().into_boxed_str()))
    }

    /// Access the underlying string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkerName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Non-empty study name, derived from the archive filename minus extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudyName(Box<str>);

impl StudyName {
    /// Parse a study name, rejecting empty (post-trim) input.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, PrimitiveError> {
        let trimmed = trimmed_non_empty(input.as_ref()).ok_or(PrimitiveError::EmptyStudyName)?;
        Ok(Self(trimmed.to_owned().into_boxed_str()))
    }

    /// Access the underlying string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StudyName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// One simulation year index from a study's active playlist.
pub type YearIndex = u32;

/// Monotonically increasing enqueue-order counter, process-wide.
pub type Sequence = u64;

fn trimmed_non_empty(input: &str) -> Option<&str> {
    let trimmed = input.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_accepts_boundary_values() {
        assert_eq!(Priority::parse(1).unwrap().value(), 1);
        assert_eq!(Priority::parse(100).unwrap().value(), 100);
    }

    #[test]
    fn priority_rejects_out_of_range() {
        assert!(Priority::parse(0).is_err());
        assert!(Priority::parse(101).is_err());
    }

    #[test]
    fn submitter_id_rejects_blank_input() {
        assert!(SubmitterId::parse("   ").is_err());
        assert!(SubmitterId::parse("alice").is_ok());
    }

    #[test]
    fn job_id_round_trips_through_display() {
        let id = JobId::new();
        let text = id.to_string();
        assert_eq!(JobId::parse(&text).unwrap(), id);
    }

    #[test]
    fn task_id_round_trips_through_display() {
        let id = TaskId::new();
        let text = id.to_string();
        assert_eq!(TaskId::parse(&text).unwrap(), id);
    }
}
