//! Definition of possible errors for simulation operations.

use std::fmt;

use crate::process::pcb::Pid;

/// Represents possible errors for simulation operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// Requested algorithm name is not one of `fcfs`, `rr`, `sjf`.
    UnknownAlgorithm(String),
    /// Round robin was requested without a quantum.
    MissingQuantum,
    /// Quantum must be a positive number of ticks.
    InvalidQuantum(u64),
    /// I/O generation parameters are malformed.
    InvalidIoConfig(String),
    /// Two jobs share the same pid.
    DuplicatePid(Pid),
    /// Pid does not belong to any loaded job.
    UnknownProcess(Pid),
    /// Algorithm selected a process which is not in the ready queue.
    NotReady(Pid),
    /// Algorithm dispatched another process without preempting the running one.
    DispatchWithoutPreempt {
        /// Process holding the CPU.
        running: Pid,
        /// Process selected by the algorithm.
        next: Pid,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::UnknownAlgorithm(name) => write!(f, "unsupported algorithm '{}'", name),
            SimError::MissingQuantum => write!(f, "round robin requires a quantum value"),
            SimError::InvalidQuantum(quantum) => write!(f, "quantum must be positive, got {}", quantum),
            SimError::InvalidIoConfig(reason) => write!(f, "invalid i/o configuration: {}", reason),
            SimError::DuplicatePid(pid) => write!(f, "pid {} is used by more than one job", pid),
            SimError::UnknownProcess(pid) => write!(f, "no process with pid {}", pid),
            SimError::NotReady(pid) => write!(f, "process {} was selected but is not in the ready queue", pid),
            SimError::DispatchWithoutPreempt { running, next } => write!(
                f,
                "process {} was dispatched while process {} still holds the cpu",
                next, running
            ),
        }
    }
}

impl std::error::Error for SimError {}

/// Represents result of simulation operation.
pub type SimResult<T> = Result<T, SimError>;
