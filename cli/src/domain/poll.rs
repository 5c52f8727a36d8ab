//! Fixed-interval polling budget.

use std::time::Duration;

use crate::domain::config::PollConfig;

/// A bounded, fixed-interval retry budget. No backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub budget: Duration,
}

impl PollPolicy {
    #[must_use]
    pub fn new(interval: Duration, budget: Duration) -> Self {
        Self { interval, budget }
    }

    /// Maximum number of attempts: `ceil(budget / interval)`. A zero budget
    /// allows none.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        let interval = self.interval.as_millis().max(1);
        let attempts = self.budget.as_millis().div_ceil(interval);
        u32::try_from(attempts).unwrap_or(u32::MAX)
    }
}

impl From<PollConfig> for PollPolicy {
    fn from(cfg: PollConfig) -> Self {
        Self::new(
            Duration::from_secs(cfg.interval_secs),
            Duration::from_secs(cfg.timeout_secs),
        )
    }
}
