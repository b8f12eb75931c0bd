//! Job descriptors accepted by the simulator.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::io::IoEvent;
use super::pcb::Pid;

/// Free-form job metadata.
pub type Metadata = serde_json::Map<String, Value>;

/// Metadata key which disables I/O generation for a single job.
pub const IO_ENABLED_KEY: &str = "io_enabled";

/// Declarative job description, typically produced by parsers or adapters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSpec {
    /// Unique process identifier.
    pub pid: Pid,
    /// Tick at which the job becomes ready.
    #[serde(default)]
    pub arrival: u64,
    /// Total CPU time required by the job.
    pub burst: u64,
    /// Optional priority. Carried through, not used by the bundled algorithms.
    #[serde(default)]
    pub priority: Option<i32>,
    /// Opaque metadata.
    #[serde(default)]
    pub metadata: Metadata,
    /// Explicit I/O events. When set, randomized generation is skipped for this job.
    #[serde(default)]
    pub io_schedule: Option<Vec<IoEvent>>,
}

impl JobSpec {
    /// Creates a new job without priority, metadata or I/O.
    pub fn new(pid: Pid, arrival: u64, burst: u64) -> Self {
        Self {
            pid,
            arrival,
            burst,
            priority: None,
            metadata: Metadata::new(),
            io_schedule: None,
        }
    }

    /// Sets the job priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Adds a metadata entry.
    pub fn with_metadata(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_owned(), value.into());
        self
    }

    /// Attaches an explicit I/O schedule.
    pub fn with_io_schedule(mut self, events: Vec<IoEvent>) -> Self {
        self.io_schedule = Some(events);
        self
    }

    /// Returns false if the metadata switches I/O generation off for this job.
    pub fn io_enabled(&self) -> bool {
        self.metadata
            .get(IO_ENABLED_KEY)
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }
}
