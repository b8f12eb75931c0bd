//! Scheduling algorithms.
//!
//! An algorithm never touches the queues. It looks at the running process and a
//! read-only [`ReadyView`] and returns a [`Decision`]; the simulator performs every
//! enqueue and dequeue the decision implies.

use std::fmt;
use std::str::FromStr;

use dyn_clone::DynClone;
use serde::{Deserialize, Serialize};
use sugars::boxed;

use crate::process::pcb::{Pcb, Pid};
use crate::process::table::ProcessTable;
use crate::queue::ProcessQueue;
use crate::result::{SimError, SimResult};

pub mod fcfs;
pub mod round_robin;
pub mod sjf;

pub use fcfs::Fcfs;
pub use round_robin::RoundRobin;
pub use sjf::Sjf;


/// Outcome of a scheduling step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decision {
    /// Process which holds the CPU during this tick.
    pub next_process: Option<Pid>,
    /// Whether the running process must go back to the ready queue.
    pub preempt_current: bool,
    /// Time slice granted to the next process, if the policy has one.
    pub timeslice: Option<u64>,
    /// Free-form explanation, useful for traces.
    pub note: Option<String>,
}

impl Decision {
    /// Runs the given process (or nothing) without preemption.
    pub fn run(next_process: Option<Pid>) -> Self {
        Self {
            next_process,
            ..Self::default()
        }
    }

    /// Preempts the running process in favour of `next_process`.
    pub fn preempt(next_process: Pid) -> Self {
        Self {
            next_process: Some(next_process),
            preempt_current: true,
            ..Self::default()
        }
    }

    /// Sets the granted time slice.
    pub fn with_timeslice(mut self, timeslice: u64) -> Self {
        self.timeslice = Some(timeslice);
        self
    }

    /// Sets the note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Read-only view of the ready queue with access to the queued control blocks.
#[derive(Clone, Copy)]
pub struct ReadyView<'a> {
    queue: &'a ProcessQueue,
    table: &'a ProcessTable,
}

impl<'a> ReadyView<'a> {
    /// Creates a view over `queue` resolving pids through `table`.
    pub fn new(queue: &'a ProcessQueue, table: &'a ProcessTable) -> Self {
        Self { queue, table }
    }

    /// Returns the head of the queue.
    pub fn head(&self) -> Option<&'a Pcb> {
        self.queue.peek().and_then(|pid| self.table.get(pid))
    }

    /// Iterates over queued processes from head to tail.
    pub fn iter(&self) -> impl Iterator<Item = &'a Pcb> + 'a {
        let (queue, table) = (self.queue, self.table);
        queue.iter().filter_map(move |pid| table.get(pid))
    }

    /// Returns the number of queued processes.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns true if the ready queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Policy converting the current queue contents into a "what runs next" decision.
pub trait SchedulingAlgorithm: DynClone {
    /// Short name of the policy.
    fn name(&self) -> &'static str;

    /// Clears internal bookkeeping before a run. Must be idempotent.
    fn reset(&mut self);

    /// Orders the jobs which have already arrived when the run starts.
    /// The simulator enqueues them in the resulting order.
    fn prime(&mut self, initial: &mut [&Pcb]);

    /// Decides which process runs during the tick starting at `current_time`.
    fn next_tick(&mut self, current_time: u64, running: Option<&Pcb>, ready: ReadyView<'_>) -> Decision;

    /// Accepts a time slice override. Returns false if the policy has no time slice.
    fn set_time_slice(&mut self, _time_slice: u64) -> bool {
        false
    }

    /// Returns the current time slice of the policy, if any.
    fn time_slice(&self) -> Option<u64> {
        None
    }
}

dyn_clone::clone_trait_object!(SchedulingAlgorithm);

/// Supported scheduling policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlgorithmKind {
    /// First come, first served.
    Fcfs,
    /// Round robin with a fixed quantum.
    #[serde(rename = "rr")]
    RoundRobin,
    /// Non-preemptive shortest job first.
    Sjf,
}

impl AlgorithmKind {
    /// Returns the canonical name.
    pub fn name(self) -> &'static str {
        match self {
            AlgorithmKind::Fcfs => "fcfs",
            AlgorithmKind::RoundRobin => "rr",
            AlgorithmKind::Sjf => "sjf",
        }
    }

    /// Instantiates the policy. The quantum is mandatory for round robin and ignored otherwise.
    pub fn build(self, quantum: Option<u64>) -> SimResult<Box<dyn SchedulingAlgorithm>> {
        let algorithm: Box<dyn SchedulingAlgorithm> = match self {
            AlgorithmKind::Fcfs => boxed!(Fcfs::new()),
            AlgorithmKind::RoundRobin => {
                let quantum = quantum.ok_or(SimError::MissingQuantum)?;
                boxed!(RoundRobin::new(quantum)?)
            }
            AlgorithmKind::Sjf => boxed!(Sjf::new()),
        };
        Ok(algorithm)
    }
}

impl FromStr for AlgorithmKind {
    type Err = SimError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_lowercase().as_str() {
            "fcfs" => Ok(AlgorithmKind::Fcfs),
            "rr" => Ok(AlgorithmKind::RoundRobin),
            "sjf" => Ok(AlgorithmKind::Sjf),
            _ => Err(SimError::UnknownAlgorithm(name.to_owned())),
        }
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
