//! First come, first served.

use crate::process::pcb::Pcb;

use super::{Decision, ReadyView, SchedulingAlgorithm};

/// Non-preemptive FCFS: the running process keeps the CPU until it blocks or terminates.
#[derive(Debug, Clone, Default)]
pub struct Fcfs;

impl Fcfs {
    /// Creates the policy.
    pub fn new() -> Self {
        Self
    }
}

impl SchedulingAlgorithm for Fcfs {
    fn name(&self) -> &'static str {
        "fcfs"
    }

    fn reset(&mut self) {}

    fn prime(&mut self, initial: &mut [&Pcb]) {
        // stable: equal arrivals keep the job list order
        initial.sort_by_key(|pcb| pcb.arrival_time());
    }

    fn next_tick(&mut self, _current_time: u64, running: Option<&Pcb>, ready: ReadyView<'_>) -> Decision {
        match running {
            Some(pcb) => Decision::run(Some(pcb.pid())),
            None => Decision::run(ready.head().map(Pcb::pid)),
        }
    }
}
