use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use env_logger::Builder;
use lazy_static::lazy_static;
use log::LevelFilter;
use regex::Regex;

use schedsim::{
    JobSpec, SimResult, SimService, SimulationMetrics, SimulationOptions, SimulationRequest, Simulator,
};

lazy_static! {
    static ref JOB_RE: Regex = Regex::new(r"^(\d+):(\d+):(\d+)(?::(-?\d+))?$").unwrap();
}

/// Runs a CPU scheduling simulation and prints its metrics as JSON.
#[derive(Parser, Debug)]
#[clap(version, long_about = None)]
struct Args {
    /// Scheduling algorithm: fcfs, rr or sjf
    #[clap(short, long, default_value = "fcfs")]
    algo: String,

    /// Round robin quantum
    #[clap(short, long)]
    quantum: Option<u64>,

    /// Job given as pid:arrival:burst[:priority], may be repeated
    #[clap(short, long = "job", value_parser = parse_job, required = true)]
    jobs: Vec<JobSpec>,

    /// Time slice override
    #[clap(long)]
    time_slice: Option<u64>,

    /// Stop the run at this time
    #[clap(long)]
    max_time: Option<u64>,

    /// Disable random I/O requests, which are generated by default
    #[clap(long)]
    no_io: bool,

    /// Mean gap between I/O requests, in executed ticks
    #[clap(long)]
    io_interval_mean: Option<f64>,

    /// Standard deviation of the gap between I/O requests
    #[clap(long)]
    io_interval_stddev: Option<f64>,

    /// Mean duration of an I/O request
    #[clap(long)]
    io_duration_mean: Option<f64>,

    /// Standard deviation of the I/O request duration
    #[clap(long)]
    io_duration_stddev: Option<f64>,

    /// Maximum number of I/O requests per process
    #[clap(long)]
    io_max_events: Option<usize>,

    /// Random seed
    #[clap(long, default_value = "12345")]
    seed: u64,

    /// Write the event trace to this file as JSON lines
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// Print the event trace
    #[clap(long)]
    debug: bool,
}

fn init_logger(level: LevelFilter) {
    Builder::new().filter(None, level).init();
}

fn parse_job(s: &str) -> Result<JobSpec, String> {
    let caps = JOB_RE
        .captures(s.trim())
        .ok_or_else(|| format!("expected pid:arrival:burst[:priority], got '{}'", s))?;
    let number = |i: usize| -> Result<u64, String> { caps[i].parse().map_err(|e| format!("'{}': {}", &caps[i], e)) };

    let mut job = JobSpec::new(number(1)?, number(2)?, number(3)?);
    if let Some(priority) = caps.get(4) {
        let priority = priority
            .as_str()
            .parse()
            .map_err(|e| format!("'{}': {}", priority.as_str(), e))?;
        job = job.with_priority(priority);
    }
    Ok(job)
}

impl Args {
    fn request(&self) -> SimulationRequest {
        let defaults = SimulationOptions::default();
        let options = SimulationOptions {
            time_slice: self.time_slice,
            max_time: self.max_time,
            io_enabled: !self.no_io,
            io_interval_mean: self.io_interval_mean.unwrap_or(defaults.io_interval_mean),
            io_interval_stddev: self.io_interval_stddev.unwrap_or(defaults.io_interval_stddev),
            io_duration_mean: self.io_duration_mean.unwrap_or(defaults.io_duration_mean),
            io_duration_stddev: self.io_duration_stddev.unwrap_or(defaults.io_duration_stddev),
            io_max_events: self.io_max_events.or(defaults.io_max_events),
            seed: self.seed,
        };
        SimulationRequest {
            jobs: self.jobs.clone(),
            algorithm: self.algo.clone(),
            quantum: self.quantum,
            options,
        }
    }
}

fn simulate(args: &Args) -> SimResult<SimulationMetrics> {
    let request = args.request();
    let service = SimService::new();
    let config = service.build_config(&request)?;

    // the service runs without a log file, so the simulator is driven here
    let mut sim = Simulator::new(config)?;
    if let Some(path) = &args.log_file {
        if let Err(err) = sim.set_log_file(path) {
            log::error!("cannot open {}: {}", path.display(), err);
        }
    }
    sim.load_jobs(request.jobs)?;
    sim.run()
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(if args.debug { LevelFilter::Trace } else { LevelFilter::Info });

    match simulate(&args) {
        Ok(metrics) => match serde_json::to_string_pretty(&metrics) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("error: {}", err);
                ExitCode::FAILURE
            }
        },
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
