//! I/O interruptions attached to a process.

use std::f64::consts::PI;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::result::{SimError, SimResult};

/// Represents a single blocking I/O request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoEvent {
    /// Executed CPU time at which the request is issued.
    pub trigger_at: u64,
    /// Number of ticks the process stays blocked.
    pub duration: u64,
}

impl IoEvent {
    /// Creates a new I/O event.
    pub fn new(trigger_at: u64, duration: u64) -> Self {
        Self { trigger_at, duration }
    }
}

/// Ordered list of I/O events with a cursor pointing to the next one to fire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IoSchedule {
    events: Vec<IoEvent>,
    cursor: usize,
}

impl IoSchedule {
    /// Creates a schedule from explicit events. Events are ordered by trigger point.
    pub fn new(mut events: Vec<IoEvent>) -> Self {
        events.sort_by_key(|event| event.trigger_at);
        Self { events, cursor: 0 }
    }

    /// Returns all events of the schedule, including the fired ones.
    pub fn events(&self) -> &[IoEvent] {
        &self.events
    }

    /// Returns the next event which has not fired yet.
    pub fn next_event(&self) -> Option<&IoEvent> {
        self.events.get(self.cursor)
    }

    /// Returns the number of fired events.
    pub fn fired(&self) -> usize {
        self.cursor
    }

    /// Returns the total number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if the schedule has no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Fires the next event if its trigger point is reached.
    pub(crate) fn take_due(&mut self, executed_time: u64) -> Option<IoEvent> {
        let event = *self.events.get(self.cursor)?;
        if event.trigger_at <= executed_time {
            self.cursor += 1;
            Some(event)
        } else {
            None
        }
    }
}

/// Parameters of randomized I/O generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IoConfig {
    /// Global switch for I/O generation.
    pub enabled: bool,
    /// Mean gap between two requests, in executed CPU ticks.
    pub interval_mean: f64,
    /// Standard deviation of the gap.
    pub interval_stddev: f64,
    /// Mean duration of a request.
    pub duration_mean: f64,
    /// Standard deviation of the duration.
    pub duration_stddev: f64,
    /// Upper bound on the number of requests per process.
    pub max_events: Option<usize>,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_mean: 5.0,
            interval_stddev: 1.5,
            duration_mean: 3.0,
            duration_stddev: 1.0,
            max_events: None,
        }
    }
}

impl IoConfig {
    /// Returns the default parameters with generation switched off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Checks that the distribution parameters are usable.
    pub fn validate(&self) -> SimResult<()> {
        let params = [
            ("interval_mean", self.interval_mean),
            ("interval_stddev", self.interval_stddev),
            ("duration_mean", self.duration_mean),
            ("duration_stddev", self.duration_stddev),
        ];
        for (name, value) in params {
            if !value.is_finite() {
                return Err(SimError::InvalidIoConfig(format!("{} must be finite", name)));
            }
        }
        if self.interval_stddev < 0. || self.duration_stddev < 0. {
            return Err(SimError::InvalidIoConfig(
                "standard deviation must not be negative".to_owned(),
            ));
        }
        Ok(())
    }

    /// Generates a schedule for a process with the given CPU demand.
    ///
    /// Trigger points accumulate sampled gaps and stay strictly below `burst_time`,
    /// so a process never blocks on its last unit of work.
    pub fn generate<R: Rng + ?Sized>(&self, burst_time: u64, rng: &mut R) -> IoSchedule {
        if !self.enabled || self.interval_mean <= 0. || self.duration_mean <= 0. {
            return IoSchedule::default();
        }

        let mut events = Vec::new();
        let mut cursor = 0u64;
        loop {
            if let Some(max_events) = self.max_events {
                if events.len() >= max_events {
                    break;
                }
            }
            cursor = cursor.saturating_add(sample_ticks(rng, self.interval_mean, self.interval_stddev));
            if cursor >= burst_time {
                break;
            }
            let duration = sample_ticks(rng, self.duration_mean, self.duration_stddev);
            events.push(IoEvent::new(cursor, duration));
        }

        IoSchedule::new(events)
    }
}

fn sample_ticks<R: Rng + ?Sized>(rng: &mut R, mean: f64, stddev: f64) -> u64 {
    let value = mean + stddev * standard_normal(rng);
    value.round().max(1.) as u64
}

// Box-Muller transform. `u1` is taken from (0, 1] to keep the logarithm finite.
fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1: f64 = 1. - rng.gen_range(0.0..1.0);
    let u2: f64 = rng.gen_range(0.0..1.0);
    (-2. * u1.ln()).sqrt() * (2. * PI * u2).cos()
}
