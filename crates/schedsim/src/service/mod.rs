//! Facade which hides simulator wiring from adapters.
//!
//! Adapters (command-line tools, web views) describe a run with a
//! [`SimulationRequest`], typically deserialized from JSON, and get the metrics back.

use serde::{Deserialize, Serialize};

use crate::algorithm::AlgorithmKind;
use crate::metrics::SimulationMetrics;
use crate::process::io::IoConfig;
use crate::process::job::JobSpec;
use crate::result::SimResult;
use crate::sim::{SimulationConfig, Simulator, DEFAULT_SEED};


/// Optional knobs of a simulation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationOptions {
    /// Time slice override for algorithms which have one.
    pub time_slice: Option<u64>,
    /// Cutoff time.
    pub max_time: Option<u64>,
    /// Switches randomized I/O generation on.
    pub io_enabled: bool,
    /// See [`IoConfig::interval_mean`].
    pub io_interval_mean: f64,
    /// See [`IoConfig::interval_stddev`].
    pub io_interval_stddev: f64,
    /// See [`IoConfig::duration_mean`].
    pub io_duration_mean: f64,
    /// See [`IoConfig::duration_stddev`].
    pub io_duration_stddev: f64,
    /// See [`IoConfig::max_events`].
    pub io_max_events: Option<usize>,
    /// Seed of the random source.
    pub seed: u64,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        let io = IoConfig::default();
        Self {
            time_slice: None,
            max_time: None,
            io_enabled: io.enabled,
            io_interval_mean: io.interval_mean,
            io_interval_stddev: io.interval_stddev,
            io_duration_mean: io.duration_mean,
            io_duration_stddev: io.duration_stddev,
            io_max_events: io.max_events,
            seed: DEFAULT_SEED,
        }
    }
}

impl SimulationOptions {
    /// Returns the I/O generation parameters described by the options.
    pub fn io_config(&self) -> IoConfig {
        IoConfig {
            enabled: self.io_enabled,
            interval_mean: self.io_interval_mean,
            interval_stddev: self.io_interval_stddev,
            duration_mean: self.io_duration_mean,
            duration_stddev: self.io_duration_stddev,
            max_events: self.io_max_events,
        }
    }
}

/// Payload accepted by [`SimService::run`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    /// Workload.
    pub jobs: Vec<JobSpec>,
    /// Algorithm name: `fcfs`, `rr` or `sjf`.
    pub algorithm: String,
    /// Quantum, required by round robin.
    #[serde(default)]
    pub quantum: Option<u64>,
    /// Run options.
    #[serde(default)]
    pub options: SimulationOptions,
}

impl SimulationRequest {
    /// Creates a request with default options.
    pub fn new(jobs: Vec<JobSpec>, algorithm: &str) -> Self {
        Self {
            jobs,
            algorithm: algorithm.to_owned(),
            quantum: None,
            options: SimulationOptions::default(),
        }
    }

    /// Sets the quantum.
    pub fn with_quantum(mut self, quantum: u64) -> Self {
        self.quantum = Some(quantum);
        self
    }

    /// Replaces the options.
    pub fn with_options(mut self, options: SimulationOptions) -> Self {
        self.options = options;
        self
    }
}

/// Runs simulations described by requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimService;

impl SimService {
    /// Creates the service.
    pub fn new() -> Self {
        Self
    }

    /// Translates a request into a validated simulation configuration.
    pub fn build_config(&self, request: &SimulationRequest) -> SimResult<SimulationConfig> {
        let kind: AlgorithmKind = request.algorithm.parse()?;
        let options = &request.options;

        let mut config = SimulationConfig::new(kind.build(request.quantum)?)
            .with_io(options.io_config())
            .with_seed(options.seed);
        if let Some(time_slice) = options.time_slice {
            config = config.with_time_slice(time_slice);
        }
        if let Some(max_time) = options.max_time {
            config = config.with_max_time(max_time);
        }
        config.validate()?;
        Ok(config)
    }

    /// Executes the simulation for the given request.
    pub fn run(&self, request: SimulationRequest) -> SimResult<SimulationMetrics> {
        let config = self.build_config(&request)?;
        log::debug!("running {} jobs with {:?}", request.jobs.len(), config);

        let mut sim = Simulator::new(config)?;
        sim.load_jobs(request.jobs)?;
        sim.run()
    }
}
