//! Logging.

use std::{
    fs::{File, OpenOptions},
    io::{self, Write},
    path::Path,
};

use super::log_entry::LogEntry;

#[derive(Default)]
/// Implements logging of events to console and optionally to a file.
/// Also provides the access to the list of all logged events (trace).
pub struct Logger {
    log_file: Option<File>,
    trace: Vec<LogEntry>,
}

impl Logger {
    /// Creates a new console-only logger.
    pub(crate) fn new() -> Self {
        Self {
            log_file: None,
            trace: vec![],
        }
    }

    /// Creates a new logger writing events both to console and the specified file.
    pub(crate) fn with_log_file(log_path: &Path) -> io::Result<Self> {
        let log_file = OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(log_path)?;
        Ok(Self {
            log_file: Some(log_file),
            trace: vec![],
        })
    }

    pub(crate) fn has_log_file(&self) -> bool {
        self.log_file.is_some()
    }

    pub(crate) fn log(&mut self, event: LogEntry) {
        if let Some(log_file) = self.log_file.as_mut() {
            if let Err(err) = write_line(log_file, &event) {
                log::warn!("failed to write event log, file logging disabled: {}", err);
                self.log_file = None;
            }
        }

        event.print();

        self.trace.push(event);
    }

    /// Forgets logged events. The log file, if any, is kept open.
    pub(crate) fn clear(&mut self) {
        self.trace.clear();
    }

    /// Returns a reference to a vector with all logged events.
    pub fn trace(&self) -> &Vec<LogEntry> {
        &self.trace
    }
}

fn write_line(log_file: &mut File, event: &LogEntry) -> io::Result<()> {
    let serialized = serde_json::to_string(event)?;
    log_file.write_all(serialized.as_bytes())?;
    log_file.write_all("\n".as_bytes())
}
