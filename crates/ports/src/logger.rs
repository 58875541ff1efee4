//! Structured logging boundary contract.
//!
//! Carried over in spirit from the teacher's hexagonal `ports::logger`: a
//! trait so `winjobs-app`, `winjobs-adapters`, and `winjobs-infra` can emit
//! structured events without depending on a concrete sink.

use std::collections::BTreeMap;

/// Log severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Fine-grained diagnostic detail.
    Debug,
    /// Normal operational events.
    Info,
    /// Recoverable problems (reconciliation losses, missing year output).
    Warn,
    /// Caller-visible failures (persistence errors, unknown job ids).
    Error,
}

/// Additional structured event fields.
pub type LogFields = BTreeMap<&'static str, String>;

/// One structured log event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    /// Stable event name, e.g. `"assign_task"` or `"reconcile_drop"`.
    pub event: &'static str,
    /// Severity.
    pub level: LogLevel,
    /// Human-readable message.
    pub message: String,
    /// Structured fields (job id, task id, worker name, ...).
    pub fields: LogFields,
}

/// Boundary contract for structured logging.
pub trait LoggerPort: Send + Sync {
    /// Emit a structured event.
    fn log(&self, event: LogEvent);

    /// Convenience: info event.
    fn info(&self, event: &'static str, message: &str, fields: LogFields) {
        self.log(LogEvent {
            event,
            level: LogLevel::Info,
            message: message.to_owned(),
            fields,
        });
    }

    /// Convenience: warn event.
    fn warn(&self, event: &'static str, message: &str, fields: LogFields) {
        self.log(LogEvent {
            event,
            level: LogLevel::Warn,
            message: message.to_owned(),
            fields,
        });
    }

    /// Convenience: error event.
    fn error(&self, event: &'static str, message: &str, fields: LogFields) {
        self.log(LogEvent {
            event,
            level: LogLevel::Error,
            message: message.to_owned(),
            fields,
        });
    }
}
