#![warn(missing_docs)]
#![doc = include_str!("../readme.md")]

pub mod algorithm;
pub mod log;
pub mod metrics;
pub mod process;
pub mod queue;
pub mod result;
pub mod service;
pub mod sim;

pub use algorithm::{AlgorithmKind, Decision, ReadyView, SchedulingAlgorithm};
pub use metrics::{ProcessMetrics, SimulationMetrics};
pub use process::job::JobSpec;
pub use result::{SimError, SimResult};
pub use service::{SimService, SimulationOptions, SimulationRequest};
pub use sim::{SimulationConfig, Simulator};
