//! Simulation configuration.

use std::fmt;

use crate::algorithm::SchedulingAlgorithm;
use crate::process::io::IoConfig;
use crate::result::{SimError, SimResult};

/// Seed used when none is given explicitly.
pub const DEFAULT_SEED: u64 = 12345;

/// Parameters of a simulation run.
#[derive(Clone)]
pub struct SimulationConfig {
    algorithm: Box<dyn SchedulingAlgorithm>,
    time_slice: Option<u64>,
    max_time: Option<u64>,
    io: IoConfig,
    seed: u64,
}

impl SimulationConfig {
    /// Creates a configuration for the given algorithm with I/O generation switched off.
    pub fn new(algorithm: Box<dyn SchedulingAlgorithm>) -> Self {
        Self {
            algorithm,
            time_slice: None,
            max_time: None,
            io: IoConfig::disabled(),
            seed: DEFAULT_SEED,
        }
    }

    /// Returns the scheduling algorithm prototype.
    pub fn algorithm(&self) -> &(dyn SchedulingAlgorithm + 'static) {
        self.algorithm.as_ref()
    }

    /// Returns the time slice override.
    pub fn time_slice(&self) -> Option<u64> {
        self.time_slice
    }

    /// Overrides the time slice of algorithms which support one.
    pub fn with_time_slice(mut self, time_slice: u64) -> Self {
        self.time_slice = Some(time_slice);
        self
    }

    /// Returns the cutoff time.
    pub fn max_time(&self) -> Option<u64> {
        self.max_time
    }

    /// Stops the run once the clock reaches `max_time`.
    pub fn with_max_time(mut self, max_time: u64) -> Self {
        self.max_time = Some(max_time);
        self
    }

    /// Returns the I/O generation parameters.
    pub fn io(&self) -> &IoConfig {
        &self.io
    }

    /// Sets the I/O generation parameters.
    pub fn with_io(mut self, io: IoConfig) -> Self {
        self.io = io;
        self
    }

    /// Returns the seed of the random source.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Sets the seed of the random source.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Checks the configuration before it is used by a simulator.
    pub fn validate(&self) -> SimResult<()> {
        if let Some(0) = self.time_slice {
            return Err(SimError::InvalidQuantum(0));
        }
        self.io.validate()
    }
}

impl fmt::Debug for SimulationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationConfig")
            .field("algorithm", &self.algorithm.name())
            .field("time_slice", &self.time_slice)
            .field("max_time", &self.max_time)
            .field("io", &self.io)
            .field("seed", &self.seed)
            .finish()
    }
}
