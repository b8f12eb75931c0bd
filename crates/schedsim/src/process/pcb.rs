//! Process control block.

use serde::Serialize;

use super::io::IoSchedule;
use super::job::{JobSpec, Metadata};
use super::state::ProcessState;

/// Process identifier.
pub type Pid = u64;

/// First dispatch of a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Dispatch {
    /// The process has never held the CPU.
    NotStarted,
    /// The process was dispatched for the first time at the given tick.
    StartedAt(u64),
}

/// Completion record of a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Completion {
    /// The process has not terminated yet.
    Pending,
    /// The process terminated and its timings are final.
    Finished {
        /// Clock value right after the last consumed unit.
        finish_time: u64,
        /// `finish_time - arrival_time`.
        turnaround_time: u64,
        /// `turnaround_time - burst_time`.
        waiting_time: u64,
    },
}

/// Mutable record of one simulated process.
///
/// Only the simulator mutates control blocks; everyone else gets shared references.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pcb {
    pid: Pid,
    arrival_time: u64,
    burst_time: u64,
    priority: Option<i32>,
    metadata: Metadata,
    remaining_time: u64,
    state: ProcessState,
    dispatch: Dispatch,
    completion: Completion,
    executed_time: u64,
    io: IoSchedule,
    io_remaining_time: Option<u64>,
}

impl Pcb {
    /// Creates a new process in [`ProcessState::New`].
    pub fn new(pid: Pid, arrival_time: u64, burst_time: u64) -> Self {
        Self {
            pid,
            arrival_time,
            burst_time,
            priority: None,
            metadata: Metadata::new(),
            remaining_time: burst_time,
            state: ProcessState::New,
            dispatch: Dispatch::NotStarted,
            completion: Completion::Pending,
            executed_time: 0,
            io: IoSchedule::default(),
            io_remaining_time: None,
        }
    }

    /// Creates a process from a job descriptor, keeping its explicit I/O schedule if any.
    pub fn from_job(job: JobSpec) -> Self {
        let mut pcb = Self::new(job.pid, job.arrival, job.burst);
        pcb.priority = job.priority;
        pcb.metadata = job.metadata;
        if let Some(events) = job.io_schedule {
            pcb.io = IoSchedule::new(events);
        }
        pcb
    }

    /// Process identifier.
    pub fn pid(&self) -> Pid {
        self.pid
    }

    /// Tick at which the process becomes ready.
    pub fn arrival_time(&self) -> u64 {
        self.arrival_time
    }

    /// Total CPU time required.
    pub fn burst_time(&self) -> u64 {
        self.burst_time
    }

    /// Priority carried from the job.
    pub fn priority(&self) -> Option<i32> {
        self.priority
    }

    /// Metadata carried from the job.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// CPU units left to execute.
    pub fn remaining_time(&self) -> u64 {
        self.remaining_time
    }

    /// CPU units consumed so far.
    pub fn executed_time(&self) -> u64 {
        self.executed_time
    }

    /// Current life-cycle state.
    pub fn state(&self) -> ProcessState {
        self.state
    }

    /// First dispatch record.
    pub fn dispatch(&self) -> Dispatch {
        self.dispatch
    }

    /// Completion record.
    pub fn completion(&self) -> Completion {
        self.completion
    }

    /// I/O events of the process.
    pub fn io_schedule(&self) -> &IoSchedule {
        &self.io
    }

    /// Ticks left until the pending I/O request completes.
    pub fn io_remaining_time(&self) -> Option<u64> {
        self.io_remaining_time
    }

    /// Tick of the first dispatch.
    pub fn start_time(&self) -> Option<u64> {
        match self.dispatch {
            Dispatch::NotStarted => None,
            Dispatch::StartedAt(time) => Some(time),
        }
    }

    /// Time from arrival to the first dispatch.
    pub fn response_time(&self) -> Option<u64> {
        self.start_time().map(|start| start - self.arrival_time)
    }

    /// Tick at which the process terminated.
    pub fn finish_time(&self) -> Option<u64> {
        match self.completion {
            Completion::Pending => None,
            Completion::Finished { finish_time, .. } => Some(finish_time),
        }
    }

    /// Time from arrival to termination.
    pub fn turnaround_time(&self) -> Option<u64> {
        match self.completion {
            Completion::Pending => None,
            Completion::Finished { turnaround_time, .. } => Some(turnaround_time),
        }
    }

    /// Turnaround time minus burst time.
    pub fn waiting_time(&self) -> Option<u64> {
        match self.completion {
            Completion::Pending => None,
            Completion::Finished { waiting_time, .. } => Some(waiting_time),
        }
    }

    pub(crate) fn set_state(&mut self, state: ProcessState) {
        debug_assert!(
            self.state.can_transition_to(state),
            "process {}: illegal transition {} -> {}",
            self.pid,
            self.state,
            state
        );
        self.state = state;
    }

    pub(crate) fn set_io_schedule(&mut self, schedule: IoSchedule) {
        self.io = schedule;
    }

    /// Records the first dispatch. Returns false if the process was dispatched before.
    pub(crate) fn mark_dispatched(&mut self, time: u64) -> bool {
        match self.dispatch {
            Dispatch::NotStarted => {
                self.dispatch = Dispatch::StartedAt(time);
                true
            }
            Dispatch::StartedAt(_) => false,
        }
    }

    /// Runs the process for `time_slice` units. Remaining time never drops below zero,
    /// while executed time always grows by the full slice.
    pub(crate) fn consume(&mut self, time_slice: u64) {
        self.remaining_time = self.remaining_time.saturating_sub(time_slice);
        self.executed_time += time_slice;
    }

    /// Fires at most one due I/O request and returns its duration.
    pub(crate) fn io_request_due(&mut self) -> Option<u64> {
        if self.remaining_time == 0 {
            return None;
        }
        let event = self.io.take_due(self.executed_time)?;
        self.io_remaining_time = Some(event.duration);
        Some(event.duration)
    }

    /// Advances the pending I/O request by one tick. Returns true when it completes.
    pub(crate) fn tick_io(&mut self) -> bool {
        match self.io_remaining_time {
            Some(left) if left > 1 => {
                self.io_remaining_time = Some(left - 1);
                false
            }
            Some(_) => {
                self.io_remaining_time = None;
                true
            }
            None => false,
        }
    }

    pub(crate) fn finalize(&mut self, clock: u64) {
        let turnaround_time = clock.saturating_sub(self.arrival_time);
        self.completion = Completion::Finished {
            finish_time: clock,
            turnaround_time,
            waiting_time: turnaround_time.saturating_sub(self.burst_time),
        };
        self.set_state(ProcessState::Terminated);
    }
}
