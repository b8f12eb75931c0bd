//! Discrete-time simulation engine.

use std::collections::VecDeque;
use std::io;
use std::path::Path;

use rand::SeedableRng;
use rand_pcg::Pcg64;

use crate::algorithm::{Decision, ReadyView, SchedulingAlgorithm};
use crate::log::log_entry::LogEntry;
use crate::log::logger::Logger;
use crate::metrics::SimulationMetrics;
use crate::process::io::{IoEvent, IoSchedule};
use crate::process::job::JobSpec;
use crate::process::pcb::{Pcb, Pid};
use crate::process::state::ProcessState;
use crate::process::table::ProcessTable;
use crate::queue::ProcessQueue;
use crate::result::{SimError, SimResult};

use super::config::SimulationConfig;

/// Runs a scheduling algorithm over a set of jobs, one tick at a time.
///
/// The simulator owns every control block and both queues. Algorithms only see
/// shared references and answer with a [`Decision`], which the simulator applies.
/// A simulator can be reused: [`Simulator::load_jobs`] resets all run state.
pub struct Simulator {
    config: SimulationConfig,
    algorithm: Box<dyn SchedulingAlgorithm>,
    table: ProcessTable,
    pending: VecDeque<Pid>,
    ready_queue: ProcessQueue,
    blocked_queue: ProcessQueue,
    completed: Vec<Pid>,
    running: Option<Pid>,
    clock: u64,
    busy_time: u64,
    context_switches: u64,
    rng: Pcg64,
    logger: Logger,
}

impl Simulator {
    /// Creates a simulator after validating the configuration.
    pub fn new(config: SimulationConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self {
            algorithm: dyn_clone::clone_box(config.algorithm()),
            rng: Pcg64::seed_from_u64(config.seed()),
            config,
            table: ProcessTable::new(),
            pending: VecDeque::new(),
            ready_queue: ProcessQueue::ready(),
            blocked_queue: ProcessQueue::blocked(),
            completed: Vec::new(),
            running: None,
            clock: 0,
            busy_time: 0,
            context_switches: 0,
            logger: Logger::new(),
        })
    }

    /// Writes subsequent events to the given file as JSON lines.
    pub fn set_log_file(&mut self, path: &Path) -> io::Result<()> {
        self.logger = Logger::with_log_file(path)?;
        Ok(())
    }

    /// Returns true if events are written to a file.
    pub fn has_log_file(&self) -> bool {
        self.logger.has_log_file()
    }

    /// Replaces the workload. All state of the previous run is discarded and the
    /// random source is reseeded, so loading the same jobs twice gives identical runs.
    pub fn load_jobs(&mut self, jobs: impl IntoIterator<Item = JobSpec>) -> SimResult<()> {
        self.reset();

        let mut arrivals = Vec::new();
        for job in jobs {
            let generate = job.io_schedule.is_none() && self.config.io().enabled && job.io_enabled();
            let mut pcb = Pcb::from_job(job);
            if generate {
                pcb.set_io_schedule(self.config.io().generate(pcb.burst_time(), &mut self.rng));
            }
            arrivals.push((pcb.arrival_time(), pcb.pid()));
            if let Err(err) = self.table.insert(pcb) {
                self.reset();
                return Err(err);
            }
        }

        // stable: jobs arriving together keep the input order
        arrivals.sort_by_key(|&(arrival, _)| arrival);
        self.pending = arrivals.into_iter().map(|(_, pid)| pid).collect();

        self.logger.log(LogEntry::JobsLoaded {
            time: self.clock,
            jobs: self.table.len(),
            algorithm: self.algorithm.name().to_owned(),
        });
        let schedules: Vec<(Pid, Vec<IoEvent>)> = self
            .table
            .iter()
            .filter(|pcb| !pcb.io_schedule().is_empty())
            .map(|pcb| (pcb.pid(), pcb.io_schedule().events().to_vec()))
            .collect();
        for (pid, events) in schedules {
            self.logger.log(LogEntry::IoScheduled {
                time: self.clock,
                pid,
                events,
            });
        }
        Ok(())
    }

    /// Replaces the I/O schedule of a loaded process. Must be called before [`Simulator::run`].
    pub fn set_io_schedule(&mut self, pid: Pid, events: Vec<IoEvent>) -> SimResult<()> {
        let pcb = self.table.expect_mut(pid)?;
        pcb.set_io_schedule(IoSchedule::new(events));
        let events = pcb.io_schedule().events().to_vec();
        self.logger.log(LogEntry::IoScheduled {
            time: self.clock,
            pid,
            events,
        });
        Ok(())
    }

    /// Runs the loaded jobs until all of them terminate or the cutoff time is reached.
    pub fn run(&mut self) -> SimResult<SimulationMetrics> {
        if self.table.is_empty() {
            return Ok(SimulationMetrics::default());
        }

        if let Some(time_slice) = self.config.time_slice() {
            if !self.algorithm.set_time_slice(time_slice) {
                log::debug!(
                    "algorithm {} has no time slice, override {} ignored",
                    self.algorithm.name(),
                    time_slice
                );
            }
        }
        self.algorithm.reset();
        self.admit_initial();

        loop {
            if self.completed.len() == self.table.len() {
                break;
            }
            if let Some(max_time) = self.config.max_time() {
                if self.clock >= max_time {
                    self.logger.log(LogEntry::RunTruncated {
                        time: self.clock,
                        incomplete: self.table.len() - self.completed.len(),
                    });
                    break;
                }
            }

            self.admit_arrivals();
            self.tick_blocked()?;

            if self.running.is_none() && self.ready_queue.is_empty() {
                if !self.blocked_queue.is_empty() {
                    self.logger.log(LogEntry::CpuIdle {
                        time: self.clock,
                        blocked: self.blocked_queue.len(),
                    });
                    self.clock += 1;
                    continue;
                }
                if let Some(next_arrival) = self.next_arrival() {
                    let to = next_arrival.max(self.clock + 1);
                    log::debug!("cpu idle, jumping from {} to {}", self.clock, to);
                    self.logger.log(LogEntry::ClockJumped { from: self.clock, to });
                    self.clock = to;
                    continue;
                }
                break;
            }

            let decision = {
                let running = match self.running {
                    Some(pid) => Some(self.table.expect(pid)?),
                    None => None,
                };
                let ready = ReadyView::new(&self.ready_queue, &self.table);
                self.algorithm.next_tick(self.clock, running, ready)
            };
            self.apply(decision)?;

            self.execute()?;
            self.clock += 1;
            self.complete_running()?;
        }

        self.logger.log(LogEntry::RunFinished {
            time: self.clock,
            completed: self.completed.len(),
            context_switches: self.context_switches,
        });

        let completed = self.completed.iter().filter_map(|&pid| self.table.get(pid));
        Ok(SimulationMetrics::from_pcbs(completed).with_run_totals(
            self.clock,
            self.busy_time,
            self.context_switches,
            self.table.len() - self.completed.len(),
        ))
    }

    /// Returns the current time.
    pub fn clock(&self) -> u64 {
        self.clock
    }

    /// Returns terminated processes in completion order.
    pub fn completed(&self) -> Vec<&Pcb> {
        self.completed.iter().filter_map(|&pid| self.table.get(pid)).collect()
    }

    /// Returns a loaded process by its pid.
    pub fn process(&self, pid: Pid) -> Option<&Pcb> {
        self.table.get(pid)
    }

    /// Returns all loaded processes.
    pub fn processes(&self) -> &ProcessTable {
        &self.table
    }

    /// Returns the process holding the CPU.
    pub fn running(&self) -> Option<&Pcb> {
        self.running.and_then(|pid| self.table.get(pid))
    }

    /// Returns the queue of processes waiting for the CPU.
    pub fn ready_queue(&self) -> &ProcessQueue {
        &self.ready_queue
    }

    /// Returns the queue of processes waiting for I/O.
    pub fn blocked_queue(&self) -> &ProcessQueue {
        &self.blocked_queue
    }

    /// Returns the algorithm instance used by the simulator.
    pub fn algorithm(&self) -> &dyn SchedulingAlgorithm {
        self.algorithm.as_ref()
    }

    /// Returns the configuration of the simulator.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Returns events logged since the last [`Simulator::load_jobs`].
    pub fn trace(&self) -> &Vec<LogEntry> {
        self.logger.trace()
    }

    fn reset(&mut self) {
        self.algorithm = dyn_clone::clone_box(self.config.algorithm());
        self.table.clear();
        self.pending.clear();
        self.ready_queue.clear();
        self.blocked_queue.clear();
        self.completed.clear();
        self.running = None;
        self.clock = 0;
        self.busy_time = 0;
        self.context_switches = 0;
        self.rng = Pcg64::seed_from_u64(self.config.seed());
        self.logger.clear();
    }

    fn next_arrival(&self) -> Option<u64> {
        let pid = *self.pending.front()?;
        self.table.get(pid).map(Pcb::arrival_time)
    }

    fn take_arrived(&mut self) -> Vec<Pid> {
        let mut arrived = Vec::new();
        while let Some(arrival) = self.next_arrival() {
            if arrival > self.clock {
                break;
            }
            arrived.extend(self.pending.pop_front());
        }
        arrived
    }

    /// Enqueues the jobs present at the start of the run in the order chosen by the algorithm.
    fn admit_initial(&mut self) {
        let arrived = self.take_arrived();
        let order: Vec<Pid> = {
            let mut initial: Vec<&Pcb> = arrived.iter().filter_map(|&pid| self.table.get(pid)).collect();
            self.algorithm.prime(&mut initial);
            initial.iter().map(|pcb| pcb.pid()).collect()
        };
        for pid in order {
            self.make_ready(pid);
        }
    }

    fn admit_arrivals(&mut self) {
        for pid in self.take_arrived() {
            self.make_ready(pid);
        }
    }

    fn make_ready(&mut self, pid: Pid) {
        if let Some(pcb) = self.table.get_mut(pid) {
            pcb.set_state(ProcessState::Ready);
            self.ready_queue.enqueue(pid);
            self.logger.log(LogEntry::ProcessArrived { time: self.clock, pid });
        }
    }

    fn tick_blocked(&mut self) -> SimResult<()> {
        let mut unblocked = Vec::new();
        for pid in self.blocked_queue.iter() {
            if self.table.expect_mut(pid)?.tick_io() {
                unblocked.push(pid);
            }
        }
        for pid in unblocked {
            self.blocked_queue.remove(pid);
            self.table.expect_mut(pid)?.set_state(ProcessState::Ready);
            self.ready_queue.enqueue(pid);
            self.logger.log(LogEntry::IoCompleted { time: self.clock, pid });
        }
        Ok(())
    }

    /// Performs the queue mutations implied by the decision.
    fn apply(&mut self, decision: Decision) -> SimResult<()> {
        let current = self.running;
        let next = match decision.next_process {
            Some(next) if Some(next) != current => next,
            Some(_) => return Ok(()),
            None => {
                if decision.preempt_current {
                    if let Some(pid) = current {
                        self.running = None;
                        self.requeue(pid)?;
                    }
                }
                return Ok(());
            }
        };

        if let Some(running) = current {
            if !decision.preempt_current {
                return Err(SimError::DispatchWithoutPreempt { running, next });
            }
        }
        if !self.ready_queue.remove(next) {
            return Err(SimError::NotReady(next));
        }

        if let Some(pid) = current {
            self.requeue(pid)?;
            self.logger.log(LogEntry::ProcessPreempted {
                time: self.clock,
                pid,
                by: next,
                note: decision.note,
            });
        }
        self.dispatch(next)
    }

    fn requeue(&mut self, pid: Pid) -> SimResult<()> {
        self.table.expect_mut(pid)?.set_state(ProcessState::Ready);
        self.ready_queue.enqueue(pid);
        Ok(())
    }

    fn dispatch(&mut self, pid: Pid) -> SimResult<()> {
        let pcb = self.table.expect_mut(pid)?;
        pcb.set_state(ProcessState::Running);
        let first = pcb.mark_dispatched(self.clock);
        self.running = Some(pid);
        self.context_switches += 1;
        self.logger.log(LogEntry::ProcessDispatched {
            time: self.clock,
            pid,
            first,
        });
        Ok(())
    }

    /// Gives one unit of CPU to the running process.
    fn execute(&mut self) -> SimResult<()> {
        let pid = match self.running {
            Some(pid) => pid,
            None => return Ok(()),
        };
        let pcb = self.table.expect_mut(pid)?;
        pcb.consume(1);
        self.busy_time += 1;
        if let Some(duration) = pcb.io_request_due() {
            pcb.set_state(ProcessState::Blocked);
            self.blocked_queue.enqueue(pid);
            self.running = None;
            self.logger.log(LogEntry::IoRequested {
                time: self.clock,
                pid,
                duration,
            });
        }
        Ok(())
    }

    fn complete_running(&mut self) -> SimResult<()> {
        let pid = match self.running {
            Some(pid) => pid,
            None => return Ok(()),
        };
        let pcb = self.table.expect_mut(pid)?;
        if pcb.remaining_time() > 0 {
            return Ok(());
        }
        pcb.finalize(self.clock);
        let (turnaround_time, waiting_time) = (
            pcb.turnaround_time().unwrap_or_default(),
            pcb.waiting_time().unwrap_or_default(),
        );
        self.completed.push(pid);
        self.running = None;
        self.logger.log(LogEntry::ProcessTerminated {
            time: self.clock,
            pid,
            turnaround_time,
            waiting_time,
        });
        Ok(())
    }
}
