//! JSON-line logging adapter (spec.md §4.10).

use std::io::Write;
use std::sync::Mutex;

use serde::Serialize;
use winjobs_ports::{LogEvent, LogLevel, LoggerPort};

#[derive(Serialize)]
struct JsonLine<'event> {
    event: &'event str,
    level: &'static str,
    message: &'event str,
    fields: &'event winjobs_ports::LogFields,
}

fn level_name(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    }
}

/// Writes one JSON object per line to an arbitrary `Write` sink, guarded
/// by a mutex since multiple worker/driver components may log
/// concurrently.
pub struct JsonLogger<W> {
    sink: Mutex<W>,
}

impl<W: Write + Send> JsonLogger<W> {
    /// Wrap `sink` as a `LoggerPort`.
    pub fn new(sink: W) -> Self {
        Self { sink: Mutex::new(sink) }
    }
}

impl JsonLogger<std::io::Stdout> {
    /// Convenience constructor writing to stdout, the default sink for
    /// both driver and worker binaries.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> LoggerPort for JsonLogger<W> {
    fn log(&self, event: LogEvent) {
        let line = JsonLine {
            event: event.event,
            level: level_name(event.level),
            message: &event.message,
            fields: &event.fields,
        };
        let Ok(mut rendered) = serde_json::to_vec(&line) else {
            return;
        };
        rendered.push(b'\n');

        if let Ok(mut sink) = self.sink.lock() {
            let _ = sink.write_all(&rendered);
            let _ = sink.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winjobs_ports::LogFields;

    #[test]
    fn logs_one_json_object_per_line() {
        let logger = JsonLogger::new(Vec::<u8>::new());
        logger.info("assign_task", "assigned", LogFields::new());
        logger.warn("reconcile_drop", "dropped stale task", LogFields::new());

        let sink = logger.sink.lock().unwrap();
        let text = String::from_utf8(sink.clone()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"event\":\"assign_task\""));
        assert!(lines[1].contains("\"level\":\"warn\""));
    }
}
