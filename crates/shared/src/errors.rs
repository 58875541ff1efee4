//! Error envelope types shared across every winjobs crate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;

/// High-level classification of error origin, mirroring §7 of the spec's
/// error taxonomy (validation / preparation / persistence / ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Expected failures the caller should be told about (bad input,
    /// validation failure, preparation failure).
    Expected,
    /// Invariant violations in domain logic — should never happen.
    Invariant,
    /// Unexpected failures (I/O, persistence, external process).
    Unexpected,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expected => formatter.write_str("expected"),
            Self::Invariant => formatter.write_str("invariant"),
            Self::Unexpected => formatter.write_str("unexpected"),
        }
    }
}

/// Retry classification for failure handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorClass {
    /// The operation can be retried safely.
    Retriable,
    /// The operation should not be retried.
    NonRetriable,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Retriable => formatter.write_str("retriable"),
            Self::NonRetriable => formatter.write_str("non-retriable"),
        }
    }
}

/// Stable, namespaced error code (e.g. `queue:not_found`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode {
    namespace: String,
    code: String,
}

impl ErrorCode {
    /// Create a new error code with a namespace and code.
    pub fn new(namespace: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            code: code.into(),
        }
    }

    /// `validation:<code>` — job/task submission failed validation.
    pub fn validation(code: impl Into<String>) -> Self {
        Self::new("validation", code)
    }

    /// `preparation:<code>` — extraction or playlist parsing failed.
    pub fn preparation(code: impl Into<String>) -> Self {
        Self::new("preparation", code)
    }

    /// `persistence:<code>` — queue/finished file write or read failed.
    pub fn persistence(code: impl Into<String>) -> Self {
        Self::new("persistence", code)
    }

    /// `queue:not_found` — job id not found.
    pub fn not_found() -> Self {
        Self::new("queue", "not_found")
    }

    /// `core:io` — a generic I/O failure.
    pub fn io() -> Self {
        Self::new("core", "io")
    }

    /// `core:internal` — anything else.
    pub fn internal() -> Self {
        Self::new("core", "internal")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", self.namespace, self.code)
    }
}

/// Structured error envelope shared across crates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Error {
    /// Origin classification.
    pub kind: ErrorKind,
    /// Retry classification.
    pub class: ErrorClass,
    /// Stable error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
}

impl Error {
    /// Create an expected, non-retriable error (the common case for
    /// validation/preparation failures surfaced to a caller).
    pub fn expected(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Expected,
            class: ErrorClass::NonRetriable,
            code,
            message: message.into(),
        }
    }

    /// Create an invariant-violation error (always non-retriable).
    pub fn invariant(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Invariant,
            class: ErrorClass::NonRetriable,
            code,
            message: message.into(),
        }
    }

    /// Create an unexpected error with an explicit retry classification.
    pub fn unexpected(code: ErrorCode, message: impl Into<String>, class: ErrorClass) -> Self {
        Self {
            kind: ErrorKind::Unexpected,
            class,
            code,
            message: message.into(),
        }
    }

    /// True when this error represents "not found".
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.code == ErrorCode::not_found()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{} {} {}: {}",
            self.kind, self.class, self.code, self.message
        )
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        let class = if is_retriable_io(error.kind()) {
            ErrorClass::Retriable
        } else {
            ErrorClass::NonRetriable
        };
        Self::unexpected(ErrorCode::io(), error.to_string(), class)
    }
}

const fn is_retriable_io(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::WouldBlock
            | io::ErrorKind::TimedOut
            | io::ErrorKind::Interrupted
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::NotConnected
            | io::ErrorKind::BrokenPipe
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_constructors_classify_correctly() {
        let expected = Error::expected(ErrorCode::validation("bad_priority"), "priority out of range");
        assert_eq!(expected.kind, ErrorKind::Expected);
        assert_eq!(expected.class, ErrorClass::NonRetriable);

        let invariant = Error::invariant(ErrorCode::internal(), "workload double-assigned");
        assert_eq!(invariant.kind, ErrorKind::Invariant);

        let unexpected = Error::unexpected(ErrorCode::persistence("write"), "disk full", ErrorClass::NonRetriable);
        assert_eq!(unexpected.kind, ErrorKind::Unexpected);
    }

    #[test]
    fn not_found_detection() {
        let err = Error::expected(ErrorCode::not_found(), "no such job");
        assert!(err.is_not_found());
        let other = Error::expected(ErrorCode::validation("x"), "y");
        assert!(!other.is_not_found());
    }

    #[test]
    fn io_error_conversion_classifies_retriable() {
        let io_err = io::Error::new(io::ErrorKind::TimedOut, "timeout");
        let err = Error::from(io_err);
        assert_eq!(err.class, ErrorClass::Retriable);
        assert_eq!(err.code, ErrorCode::io());
    }
}
