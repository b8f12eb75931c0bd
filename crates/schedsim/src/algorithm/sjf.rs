//! Shortest job first.

use crate::process::pcb::Pcb;

use super::{Decision, ReadyView, SchedulingAlgorithm};

/// Non-preemptive SJF: dispatches the ready process with the smallest remaining time.
/// A running process is never interrupted, even by a shorter arrival.
#[derive(Debug, Clone, Default)]
pub struct Sjf;

impl Sjf {
    /// Creates the policy.
    pub fn new() -> Self {
        Self
    }
}

impl SchedulingAlgorithm for Sjf {
    fn name(&self) -> &'static str {
        "sjf"
    }

    fn reset(&mut self) {}

    fn prime(&mut self, initial: &mut [&Pcb]) {
        initial.sort_by_key(|pcb| pcb.burst_time());
    }

    fn next_tick(&mut self, _current_time: u64, running: Option<&Pcb>, ready: ReadyView<'_>) -> Decision {
        if let Some(pcb) = running {
            return Decision::run(Some(pcb.pid()));
        }
        // min_by_key returns the first of equal minimums, so ties go to queue order
        let shortest = ready.iter().min_by_key(|pcb| pcb.remaining_time());
        Decision::run(shortest.map(Pcb::pid))
    }
}
