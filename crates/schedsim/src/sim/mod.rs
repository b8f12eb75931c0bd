//! Simulation driver and its configuration.

pub mod config;
pub mod simulator;

pub use config::{SimulationConfig, DEFAULT_SEED};
pub use simulator::Simulator;
