//! Exponential backoff with jitter and an elapsed-time budget.

use std::time::{Duration, Instant};

use rand::Rng;

use crate::config::RetryConfig;

/// Backoff parameters. A plain value; the running state lives in
/// [`ExponentialBackoff`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackoffPolicy {
    pub initial_interval: Duration,
    pub multiplier: f64,
    pub randomization_factor: f64,
    pub max_interval: Duration,
    pub max_elapsed_time: Duration,
}

impl BackoffPolicy {
    /// Start a new backoff sequence; the elapsed-time budget starts now.
    pub fn start(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            policy: *self,
            current_interval: self.initial_interval,
            started: Instant::now(),
        }
    }
}

impl From<&RetryConfig> for BackoffPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            initial_interval: Duration::from_millis(config.initial_interval_millis),
            multiplier: config.multiplier,
            randomization_factor: config.randomization_factor,
            max_interval: Duration::from_millis(config.max_interval_millis),
            max_elapsed_time: config.max_elapsed_time(),
        }
    }
}

/// A running backoff sequence.
#[derive(Debug)]
pub struct ExponentialBackoff {
    policy: BackoffPolicy,
    current_interval: Duration,
    started: Instant,
}

impl ExponentialBackoff {
    /// Delay before the next attempt, or `None` once the elapsed-time budget
    /// is spent.
    pub fn next_backoff(&mut self) -> Option<Duration> {
        let elapsed = self.started.elapsed();
        self.next_backoff_after(elapsed)
    }

    /// Same as [`next_backoff`](Self::next_backoff) with an explicit elapsed time.
    pub fn next_backoff_after(&mut self, elapsed: Duration) -> Option<Duration> {
        if elapsed > self.policy.max_elapsed_time {
            return None;
        }

        let delay = randomize(
            self.current_interval,
            self.policy.randomization_factor,
            rand::thread_rng().gen::<f64>(),
        );
        self.increment_interval();
        Some(delay)
    }

    /// Interval the next delay will be randomized around.
    pub fn current_interval(&self) -> Duration {
        self.current_interval
    }

    fn increment_interval(&mut self) {
        let max = self.policy.max_interval;
        if self.current_interval.as_secs_f64() >= max.as_secs_f64() / self.policy.multiplier {
            self.current_interval = max;
        } else {
            self.current_interval = self.current_interval.mul_f64(self.policy.multiplier);
        }
    }
}

/// Pick a delay in `[interval * (1 - factor), interval * (1 + factor)]`.
/// `random` is a uniform sample from `[0, 1)`.
fn randomize(interval: Duration, factor: f64, random: f64) -> Duration {
    let millis = interval.as_millis() as f64;
    let delta = factor * millis;
    let min = millis - delta;
    let max = millis + delta;
    Duration::from_millis((min + random * (max - min + 1.0)) as u64)
}
