//! Definition of events for logging.

use colored::Colorize;
use serde::Serialize;

use crate::log::util::t;
use crate::process::io::IoEvent;
use crate::process::pcb::Pid;

/// Represents a logged event.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum LogEntry {
    JobsLoaded {
        time: u64,
        jobs: usize,
        algorithm: String,
    },
    /// Generated or explicit I/O schedule attached to a process at load time.
    IoScheduled {
        time: u64,
        pid: Pid,
        events: Vec<IoEvent>,
    },
    ProcessArrived {
        time: u64,
        pid: Pid,
    },
    ProcessDispatched {
        time: u64,
        pid: Pid,
        first: bool,
    },
    ProcessPreempted {
        time: u64,
        pid: Pid,
        by: Pid,
        #[serde(skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    },
    IoRequested {
        time: u64,
        pid: Pid,
        duration: u64,
    },
    IoCompleted {
        time: u64,
        pid: Pid,
    },
    ProcessTerminated {
        time: u64,
        pid: Pid,
        turnaround_time: u64,
        waiting_time: u64,
    },
    /// Nothing was runnable during the tick.
    CpuIdle {
        time: u64,
        blocked: usize,
    },
    /// The clock skipped idle time up to the next arrival.
    ClockJumped {
        from: u64,
        to: u64,
    },
    RunTruncated {
        time: u64,
        incomplete: usize,
    },
    RunFinished {
        time: u64,
        completed: usize,
        context_switches: u64,
    },
}

impl LogEntry {
    /// Returns the simulation time of the event.
    pub fn time(&self) -> u64 {
        match self {
            LogEntry::JobsLoaded { time, .. }
            | LogEntry::IoScheduled { time, .. }
            | LogEntry::ProcessArrived { time, .. }
            | LogEntry::ProcessDispatched { time, .. }
            | LogEntry::ProcessPreempted { time, .. }
            | LogEntry::IoRequested { time, .. }
            | LogEntry::IoCompleted { time, .. }
            | LogEntry::ProcessTerminated { time, .. }
            | LogEntry::CpuIdle { time, .. }
            | LogEntry::RunTruncated { time, .. }
            | LogEntry::RunFinished { time, .. } => *time,
            LogEntry::ClockJumped { to, .. } => *to,
        }
    }

    /// Prints log entry to console.
    pub fn print(&self) {
        match self {
            LogEntry::JobsLoaded { time, jobs, algorithm } => {
                t!(format!("{:>9} - loaded {} jobs, algorithm: {}", time, jobs, algorithm).bold());
            }
            LogEntry::IoScheduled { .. } => {}
            LogEntry::ProcessArrived { time, pid } => {
                t!(format!("{:>9} {:>6} arrived", time, pid));
            }
            LogEntry::ProcessDispatched { time, pid, first } => {
                if *first {
                    t!(format!("{:>9} {:>6} ==> cpu (first dispatch)", time, pid).green());
                } else {
                    t!(format!("{:>9} {:>6} ==> cpu", time, pid).green());
                }
            }
            LogEntry::ProcessPreempted { time, pid, by, note } => {
                t!(format!(
                    "{:>9} {:>6} <== cpu, preempted by {} {}",
                    time,
                    pid,
                    by,
                    note.as_deref().unwrap_or_default()
                )
                .yellow());
            }
            LogEntry::IoRequested { time, pid, duration } => {
                t!(format!("{:>9} {:>6} --> io [{}]", time, pid, duration).blue());
            }
            LogEntry::IoCompleted { time, pid } => {
                t!(format!("{:>9} {:>6} <-- io", time, pid).cyan());
            }
            LogEntry::ProcessTerminated {
                time,
                pid,
                turnaround_time,
                waiting_time,
            } => {
                t!(format!(
                    "{:>9} {:>6} terminated, turnaround: {}, waiting: {}",
                    time, pid, turnaround_time, waiting_time
                )
                .green());
            }
            LogEntry::CpuIdle { time, blocked } => {
                t!(format!("{:>9} {:>6} cpu idle, blocked: {}", time, "-", blocked).dimmed());
            }
            LogEntry::ClockJumped { from, to } => {
                t!(format!("{:>9} - clock jumped to {}", from, to).dimmed());
            }
            LogEntry::RunTruncated { time, incomplete } => {
                t!(format!("{:>9} !!! time limit reached, {} processes incomplete", time, incomplete).red());
            }
            LogEntry::RunFinished {
                time,
                completed,
                context_switches,
            } => {
                t!(format!(
                    "{:>9} - run finished: {} completed, {} context switches",
                    time, completed, context_switches
                )
                .bold());
            }
        }
    }
}
