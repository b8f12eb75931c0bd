//! Performance metrics of a simulation run.

use serde::Serialize;

use crate::process::pcb::{Completion, Pcb, Pid};


/// Timings of one completed process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[allow(missing_docs)]
pub struct ProcessMetrics {
    pub pid: Pid,
    pub waiting_time: u64,
    pub turnaround_time: u64,
    pub response_time: u64,
}

/// Aggregated report of a simulation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimulationMetrics {
    /// Completed processes in completion order.
    pub processes: Vec<ProcessMetrics>,
    /// Completions per tick of elapsed time.
    pub throughput: f64,
    /// Share of elapsed ticks during which the CPU was busy.
    pub cpu_utilization: f64,
    /// Number of changes of the process occupying the CPU.
    pub context_switches: u64,
    /// Final clock value.
    pub elapsed_time: u64,
    /// Ticks during which some process held the CPU.
    pub busy_time: u64,
    /// Processes which did not terminate before the run stopped.
    pub incomplete: usize,
    /// Mean waiting time, absent when nothing completed.
    pub average_waiting_time: Option<f64>,
    /// Mean turnaround time.
    pub average_turnaround_time: Option<f64>,
    /// Mean response time.
    pub average_response_time: Option<f64>,
}

impl SimulationMetrics {
    /// Builds per-process records and averages from the given control blocks.
    ///
    /// Processes which have not terminated are skipped. Run-wide counters are left
    /// at zero and filled by the simulator.
    pub fn from_pcbs<'a>(pcbs: impl IntoIterator<Item = &'a Pcb>) -> Self {
        let processes: Vec<ProcessMetrics> = pcbs
            .into_iter()
            .filter_map(|pcb| match pcb.completion() {
                Completion::Pending => None,
                Completion::Finished {
                    turnaround_time,
                    waiting_time,
                    ..
                } => Some(ProcessMetrics {
                    pid: pcb.pid(),
                    waiting_time,
                    turnaround_time,
                    // Every terminated process has been dispatched at least once.
                    response_time: pcb.response_time().unwrap_or(waiting_time),
                }),
            })
            .collect();

        Self {
            average_waiting_time: average(processes.iter().map(|p| p.waiting_time)),
            average_turnaround_time: average(processes.iter().map(|p| p.turnaround_time)),
            average_response_time: average(processes.iter().map(|p| p.response_time)),
            processes,
            ..Self::default()
        }
    }

    /// Fills run-wide counters. Rates are zero when no time elapsed.
    pub(crate) fn with_run_totals(
        mut self,
        elapsed_time: u64,
        busy_time: u64,
        context_switches: u64,
        incomplete: usize,
    ) -> Self {
        self.elapsed_time = elapsed_time;
        self.busy_time = busy_time;
        self.context_switches = context_switches;
        self.incomplete = incomplete;
        if elapsed_time > 0 {
            self.throughput = self.processes.len() as f64 / elapsed_time as f64;
            self.cpu_utilization = busy_time as f64 / elapsed_time as f64;
        }
        self
    }

    /// Returns the record of a completed process.
    pub fn process(&self, pid: Pid) -> Option<&ProcessMetrics> {
        self.processes.iter().find(|p| p.pid == pid)
    }

    /// Returns the number of completed processes.
    pub fn completed(&self) -> usize {
        self.processes.len()
    }
}

fn average(values: impl Iterator<Item = u64>) -> Option<f64> {
    let (sum, count) = values.fold((0u64, 0usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum as f64 / count as f64)
    }
}
