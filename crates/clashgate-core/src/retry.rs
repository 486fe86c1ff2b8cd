//! Retry logic with capped exponential backoff.

use std::time::Duration;

/// Capped exponential backoff: `min(base * 2^attempt, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    /// Delay before the first retry.
    pub base: Duration,
    /// Ceiling applied to every computed delay.
    pub max: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(500),
            max: Duration::from_secs(8),
        }
    }
}

impl Backoff {
    pub const fn new(base: Duration, max: Duration) -> Self {
        Self { base, max }
    }

    /// Delay before retry number `attempt` (0-based).
    pub fn delay(self, attempt: u32) -> Duration {
        let scale = 2_f64.powi(attempt.min(63) as i32);
        let seconds = self.base.as_secs_f64() * scale;
        let capped_seconds = seconds.min(self.max.as_secs_f64());
        Duration::try_from_secs_f64(capped_seconds).unwrap_or(self.max)
    }
}

/// Transport-level retry budget of the request engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total attempts = `max_retries + 1`.
    pub max_retries: u32,
    pub backoff: Backoff,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff: Backoff::default(),
        }
    }
}

impl RetryConfig {
    pub fn new(max_retries: u32, backoff: Backoff) -> Self {
        Self {
            max_retries,
            backoff,
        }
    }

    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.backoff.delay(attempt)
    }
}

/// Why the engine wants another attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryReason {
    Transport,
    RateLimited { retry_after: Option<Duration> },
    ServerError,
}

/// Attempt counter for a single logical call.
///
/// The counter only advances when a retry is granted, so the delay sequence
/// is `backoff(0), backoff(1), ...` regardless of which condition triggered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempts {
    config: RetryConfig,
    attempt: u32,
}

impl Attempts {
    pub const fn new(config: RetryConfig) -> Self {
        Self { config, attempt: 0 }
    }

    /// Zero-based index of the attempt in flight.
    pub const fn current(&self) -> u32 {
        self.attempt
    }

    pub const fn exhausted(&self) -> bool {
        self.attempt >= self.config.max_retries
    }

    /// Grant another attempt and return how long to wait first, or `None`
    /// when the budget is spent.
    ///
    /// Rate-limit hints are honored but never shorten the fallback backoff.
    pub fn retry(&mut self, reason: RetryReason) -> Option<Duration> {
        if self.exhausted() {
            return None;
        }

        let backoff = self.config.delay_for_attempt(self.attempt);
        let delay = match reason {
            RetryReason::RateLimited {
                retry_after: Some(hint),
            } => hint.max(backoff),
            RetryReason::RateLimited { retry_after: None }
            | RetryReason::Transport
            | RetryReason::ServerError => backoff,
        };

        self.attempt += 1;
        Some(delay)
    }
}
