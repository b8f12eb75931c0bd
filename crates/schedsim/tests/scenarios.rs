use rstest::rstest;

use schedsim::algorithm::{AlgorithmKind, Decision, Fcfs, ReadyView, RoundRobin, SchedulingAlgorithm, Sjf};
use schedsim::process::io::{IoConfig, IoEvent};
use schedsim::process::pcb::Pcb;
use schedsim::process::state::ProcessState;
use schedsim::{JobSpec, SimError, SimulationConfig, SimulationMetrics, Simulator};

fn run(config: SimulationConfig, jobs: Vec<JobSpec>) -> (Simulator, SimulationMetrics) {
    let mut sim = Simulator::new(config).unwrap();
    sim.load_jobs(jobs).unwrap();
    let metrics = sim.run().unwrap();
    (sim, metrics)
}

fn waits(metrics: &SimulationMetrics) -> Vec<(u64, u64)> {
    metrics.processes.iter().map(|p| (p.pid, p.waiting_time)).collect()
}

fn completion_order(sim: &Simulator) -> Vec<u64> {
    sim.completed().iter().map(|pcb| pcb.pid()).collect()
}

#[test]
fn fcfs_follows_arrival_order() {
    let jobs = vec![JobSpec::new(1, 0, 3), JobSpec::new(2, 1, 2), JobSpec::new(3, 2, 1)];
    let (sim, metrics) = run(SimulationConfig::new(Box::new(Fcfs::new())), jobs);

    assert_eq!(completion_order(&sim), vec![1, 2, 3]);
    assert_eq!(waits(&metrics), vec![(1, 0), (2, 2), (3, 3)]);
    assert_eq!(metrics.context_switches, 3);
    assert_eq!(metrics.elapsed_time, 6);
    assert_eq!(metrics.throughput, 0.5);
    assert_eq!(metrics.average_waiting_time, Some(5. / 3.));
}

#[test]
fn sjf_runs_shortest_first() {
    let jobs = vec![JobSpec::new(1, 0, 5), JobSpec::new(2, 0, 2)];
    let (sim, metrics) = run(SimulationConfig::new(Box::new(Sjf::new())), jobs);

    assert_eq!(completion_order(&sim), vec![2, 1]);
    assert_eq!(waits(&metrics), vec![(2, 0), (1, 2)]);
}

#[test]
fn sjf_ties_go_to_job_order() {
    let jobs = vec![JobSpec::new(1, 0, 3), JobSpec::new(2, 0, 3)];
    let (sim, metrics) = run(SimulationConfig::new(Box::new(Sjf::new())), jobs);

    assert_eq!(completion_order(&sim), vec![1, 2]);
    assert_eq!(waits(&metrics), vec![(1, 0), (2, 3)]);
}

#[test]
fn round_robin_rotates() {
    let jobs = vec![JobSpec::new(1, 0, 4), JobSpec::new(2, 0, 4)];
    let config = SimulationConfig::new(Box::new(RoundRobin::new(2).unwrap()));
    let (_, metrics) = run(config, jobs);

    assert_eq!(metrics.context_switches, 4);
    assert_eq!(waits(&metrics), vec![(1, 2), (2, 4)]);
    assert_eq!(metrics.process(1).unwrap().response_time, 0);
    assert_eq!(metrics.process(2).unwrap().response_time, 2);
}

#[test]
fn time_slice_overrides_quantum() {
    let jobs = vec![JobSpec::new(1, 0, 4), JobSpec::new(2, 0, 4)];
    let config = SimulationConfig::new(Box::new(RoundRobin::new(5).unwrap())).with_time_slice(2);
    let (sim, metrics) = run(config, jobs);

    assert_eq!(sim.algorithm().time_slice(), Some(2));
    assert_eq!(metrics.context_switches, 4);
    assert_eq!(waits(&metrics), vec![(1, 2), (2, 4)]);
}

#[test]
fn io_blocks_and_resumes() {
    let jobs = vec![
        JobSpec::new(1, 0, 5).with_io_schedule(vec![IoEvent::new(2, 2)]),
        JobSpec::new(2, 1, 2),
    ];
    let (sim, metrics) = run(SimulationConfig::new(Box::new(Fcfs::new())), jobs);

    let first = metrics.process(1).unwrap();
    assert_eq!((first.waiting_time, first.turnaround_time), (2, 7));
    assert_eq!(metrics.process(2).unwrap().waiting_time, 1);
    assert_eq!(completion_order(&sim), vec![2, 1]);
    assert!(sim.ready_queue().is_empty());
    assert!(sim.blocked_queue().is_empty());
    assert_eq!(sim.process(1).unwrap().io_schedule().fired(), 1);
}

#[test]
fn explicit_schedule_after_loading() {
    let mut sim = Simulator::new(SimulationConfig::new(Box::new(Fcfs::new()))).unwrap();
    sim.load_jobs(vec![JobSpec::new(1, 0, 5), JobSpec::new(2, 1, 2)]).unwrap();
    sim.set_io_schedule(1, vec![IoEvent::new(2, 2)]).unwrap();
    let metrics = sim.run().unwrap();

    assert_eq!(metrics.process(1).unwrap().turnaround_time, 7);
}

#[rstest]
#[case(IoConfig::disabled())]
#[case(IoConfig::default())]
#[case(IoConfig { max_events: Some(1), ..IoConfig::default() })]
fn reload_is_idempotent(#[case] io: IoConfig) {
    let jobs = vec![
        JobSpec::new(1, 0, 12),
        JobSpec::new(2, 2, 7),
        JobSpec::new(3, 4, 20),
        JobSpec::new(4, 4, 3),
    ];
    let config = SimulationConfig::new(AlgorithmKind::RoundRobin.build(Some(3)).unwrap()).with_io(io);
    let mut sim = Simulator::new(config).unwrap();

    sim.load_jobs(jobs.clone()).unwrap();
    let first = sim.run().unwrap();
    let first_trace = sim.trace().clone();

    sim.load_jobs(jobs).unwrap();
    let second = sim.run().unwrap();

    assert_eq!(first, second);
    assert_eq!(first_trace, *sim.trace());
    assert_eq!(second.completed(), 4);
}

#[test]
fn seed_changes_generated_io() {
    let jobs: Vec<JobSpec> = (1..=5).map(|pid| JobSpec::new(pid, 0, 40)).collect();
    let io = IoConfig::default();

    let mut first = Simulator::new(SimulationConfig::new(Box::new(Fcfs::new())).with_io(io.clone())).unwrap();
    first.load_jobs(jobs.clone()).unwrap();
    let mut second = Simulator::new(SimulationConfig::new(Box::new(Fcfs::new())).with_io(io).with_seed(7)).unwrap();
    second.load_jobs(jobs).unwrap();

    let schedules = |sim: &Simulator| -> Vec<Vec<IoEvent>> {
        sim.processes()
            .iter()
            .map(|pcb| pcb.io_schedule().events().to_vec())
            .collect()
    };
    assert_ne!(schedules(&first), schedules(&second));
}

#[test]
fn cutoff_truncates_run() {
    let jobs = vec![JobSpec::new(1, 0, 10), JobSpec::new(2, 0, 10)];
    let config = SimulationConfig::new(Box::new(Fcfs::new())).with_max_time(2);
    let (sim, metrics) = run(config, jobs);

    assert_eq!(metrics.completed(), 0);
    assert_eq!(metrics.incomplete, 2);
    assert_eq!(metrics.throughput, 0.);
    assert_eq!(metrics.cpu_utilization, 1.0);
    assert_eq!(sim.clock(), 2);
    assert_eq!(sim.running().map(Pcb::pid), Some(1));
    assert_eq!(metrics.average_turnaround_time, None);
}

#[test]
fn zero_burst_job() {
    let (sim, metrics) = run(SimulationConfig::new(Box::new(Fcfs::new())), vec![JobSpec::new(1, 0, 0)]);

    let pcb = sim.process(1).unwrap();
    assert_eq!(pcb.finish_time(), Some(1));
    assert_eq!(pcb.turnaround_time(), Some(1));
    assert_eq!(pcb.state(), ProcessState::Terminated);
    assert_eq!(metrics.cpu_utilization, 1.0);
}

#[test]
fn empty_workload() {
    let (sim, metrics) = run(SimulationConfig::new(Box::new(Sjf::new())), vec![]);
    assert_eq!(metrics, SimulationMetrics::default());
    assert_eq!(sim.clock(), 0);
}

#[rstest]
fn timings_are_consistent(#[values("fcfs", "rr", "sjf")] algorithm: &str, #[values(1, 3)] quantum: u64) {
    let jobs = vec![
        JobSpec::new(1, 0, 8),
        JobSpec::new(2, 1, 4),
        JobSpec::new(3, 2, 9),
        JobSpec::new(4, 3, 5),
        JobSpec::new(5, 20, 2),
        JobSpec::new(6, 20, 0),
    ];
    let kind: AlgorithmKind = algorithm.parse().unwrap();
    let (sim, metrics) = run(SimulationConfig::new(kind.build(Some(quantum)).unwrap()), jobs);

    assert_eq!(metrics.completed(), 6);
    assert_eq!(metrics.busy_time, 29);
    for pcb in sim.completed() {
        let turnaround = pcb.turnaround_time().unwrap();
        assert_eq!(turnaround, pcb.finish_time().unwrap() - pcb.arrival_time());
        assert_eq!(
            pcb.waiting_time().unwrap(),
            turnaround.saturating_sub(pcb.burst_time())
        );
        assert!(pcb.start_time().unwrap() >= pcb.arrival_time());
        assert_eq!(pcb.remaining_time(), 0);
    }
}

#[test]
fn configuration_errors() {
    assert_eq!(AlgorithmKind::RoundRobin.build(None).err(), Some(SimError::MissingQuantum));
    assert_eq!(
        "priority".parse::<AlgorithmKind>(),
        Err(SimError::UnknownAlgorithm("priority".to_owned()))
    );
    assert_eq!(RoundRobin::new(0).err(), Some(SimError::InvalidQuantum(0)));
}

/// Dispatches a fixed pid whatever the queue holds.
#[derive(Clone)]
struct Stubborn {
    pid: u64,
    preempt: bool,
}

impl SchedulingAlgorithm for Stubborn {
    fn name(&self) -> &'static str {
        "stubborn"
    }

    fn reset(&mut self) {}

    fn prime(&mut self, _initial: &mut [&Pcb]) {}

    fn next_tick(&mut self, _current_time: u64, running: Option<&Pcb>, ready: ReadyView<'_>) -> Decision {
        match running {
            None => Decision::run(ready.head().map(Pcb::pid)),
            Some(_) if self.preempt => Decision::preempt(self.pid),
            Some(_) => Decision::run(Some(self.pid)),
        }
    }
}

#[rstest]
#[case(Stubborn { pid: 9, preempt: true }, SimError::NotReady(9))]
#[case(Stubborn { pid: 2, preempt: false }, SimError::DispatchWithoutPreempt { running: 1, next: 2 })]
fn algorithm_violations_are_rejected(#[case] algorithm: Stubborn, #[case] error: SimError) {
    let mut sim = Simulator::new(SimulationConfig::new(Box::new(algorithm))).unwrap();
    sim.load_jobs(vec![JobSpec::new(1, 0, 3), JobSpec::new(2, 0, 3)]).unwrap();
    assert_eq!(sim.run(), Err(error));
}
