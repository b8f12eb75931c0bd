//! Round robin.

use crate::process::pcb::{Pcb, Pid};
use crate::result::{SimError, SimResult};

use super::{Decision, ReadyView, SchedulingAlgorithm};

/// Preemptive round robin with a fixed quantum.
///
/// The running process is preempted once it has held the CPU for `quantum` ticks and
/// another process is ready. It then lands behind every process queued at that moment,
/// since the simulator removes the chosen successor before requeueing it.
#[derive(Debug, Clone)]
pub struct RoundRobin {
    quantum: u64,
    current_pid: Option<Pid>,
    dispatch_time: u64,
}

impl RoundRobin {
    /// Creates the policy. The quantum must be positive.
    pub fn new(quantum: u64) -> SimResult<Self> {
        if quantum == 0 {
            return Err(SimError::InvalidQuantum(quantum));
        }
        Ok(Self {
            quantum,
            current_pid: None,
            dispatch_time: 0,
        })
    }

    /// Returns the current quantum.
    pub fn quantum(&self) -> u64 {
        self.quantum
    }

    fn track(&mut self, pid: Pid, now: u64) {
        self.current_pid = Some(pid);
        self.dispatch_time = now;
    }
}

impl SchedulingAlgorithm for RoundRobin {
    fn name(&self) -> &'static str {
        "rr"
    }

    fn reset(&mut self) {
        self.current_pid = None;
        self.dispatch_time = 0;
    }

    fn prime(&mut self, initial: &mut [&Pcb]) {
        initial.sort_by_key(|pcb| pcb.arrival_time());
    }

    fn next_tick(&mut self, current_time: u64, running: Option<&Pcb>, ready: ReadyView<'_>) -> Decision {
        let decision = match running {
            None => {
                let next = ready.head().map(Pcb::pid);
                if let Some(pid) = next {
                    self.track(pid, current_time);
                }
                Decision::run(next)
            }
            Some(pcb) => {
                if self.current_pid != Some(pcb.pid()) {
                    // dispatched outside of our bookkeeping window
                    self.track(pcb.pid(), current_time);
                }
                let held = current_time.saturating_sub(self.dispatch_time);
                match ready.head() {
                    Some(head) if held >= self.quantum => {
                        self.track(head.pid(), current_time);
                        Decision::preempt(head.pid()).with_note("quantum expired")
                    }
                    _ => Decision::run(Some(pcb.pid())),
                }
            }
        };
        decision.with_timeslice(self.quantum)
    }

    fn set_time_slice(&mut self, time_slice: u64) -> bool {
        self.quantum = time_slice;
        true
    }

    fn time_slice(&self) -> Option<u64> {
        Some(self.quantum)
    }
}
