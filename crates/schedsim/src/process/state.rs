//! Life-cycle states of a simulated process.

use std::fmt;

use serde::Serialize;

/// Represents the state of a process control block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessState {
    /// Registered, but the clock has not reached its arrival time yet.
    New,
    /// Waiting in the ready queue.
    Ready,
    /// Holds the CPU during the current tick.
    Running,
    /// Waiting for an I/O event to complete.
    Blocked,
    /// Finished. No further transitions are possible.
    Terminated,
}

impl ProcessState {
    /// Returns true if the process may move from `self` to `next`.
    ///
    /// Staying in the same state is always allowed.
    pub fn can_transition_to(self, next: ProcessState) -> bool {
        use ProcessState::*;
        if self == next {
            return true;
        }
        matches!(
            (self, next),
            (New, Ready) | (Ready, Running) | (Running, Ready) | (Running, Blocked) | (Blocked, Ready) | (Running, Terminated)
        )
    }

    /// Returns true for the absorbing state.
    pub fn is_terminal(self) -> bool {
        self == ProcessState::Terminated
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProcessState::New => "NEW",
            ProcessState::Ready => "READY",
            ProcessState::Running => "RUNNING",
            ProcessState::Blocked => "BLOCKED",
            ProcessState::Terminated => "TERMINATED",
        };
        f.write_str(name)
    }
}
