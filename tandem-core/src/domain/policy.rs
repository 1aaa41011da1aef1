//! Polling policy

use std::time::Duration;

use thiserror::Error;

/// Default wait between two status queries
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Default budget from submission to terminal state (30 minutes)
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(30 * 60);

/// Reasons a policy can be rejected
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("poll interval must be greater than 0")]
    ZeroInterval,

    #[error("poll interval ({interval:?}) must be shorter than the maximum wait ({max_wait:?})")]
    IntervalNotBelowMaxWait {
        interval: Duration,
        max_wait: Duration,
    },
}

/// Timing contract for awaiting one remote job
///
/// Immutable once built; `interval < max_wait` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobPolicy {
    interval: Duration,
    max_wait: Duration,
}

impl JobPolicy {
    /// Builds a policy, validating `0 < interval < max_wait`
    pub fn new(interval: Duration, max_wait: Duration) -> Result<Self, PolicyError> {
        if interval.is_zero() {
            return Err(PolicyError::ZeroInterval);
        }

        if interval >= max_wait {
            return Err(PolicyError::IntervalNotBelowMaxWait { interval, max_wait });
        }

        Ok(Self { interval, max_wait })
    }

    /// Convenience constructor taking whole seconds
    pub fn from_secs(interval: u64, max_wait: u64) -> Result<Self, PolicyError> {
        Self::new(Duration::from_secs(interval), Duration::from_secs(max_wait))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn max_wait(&self) -> Duration {
        self.max_wait
    }
}

impl Default for JobPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_wait: DEFAULT_MAX_WAIT,
        }
    }
}
