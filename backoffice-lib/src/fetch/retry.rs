//! Retry configuration for automatic request retry.

use std::time::Duration;

use crate::config::ClientConfig;

/// Configuration for automatic retry behavior.
///
/// A failed attempt is retried after `initial_delay * 2^attempt` (attempt
/// index starting at 0). Delays are uncapped unless `max_delay` is set.
/// Any failure except an explicit cancellation is retried while attempts
/// remain.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use backoffice_lib::fetch::RetryConfig;
///
/// let config = RetryConfig::default();
/// assert_eq!(config.delay_for(0), Duration::from_secs(1));
/// assert_eq!(config.delay_for(2), Duration::from_secs(4));
///
/// // Disable all retries
/// let no_retry = RetryConfig::no_retry();
/// assert_eq!(no_retry.max_retries, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the first one.
    pub max_retries: u32,
    /// Delay before the first retry (doubles each attempt).
    pub initial_delay: Duration,
    /// Upper bound on a single delay; unbounded by default.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::MAX,
        }
    }
}

impl RetryConfig {
    /// Creates a config with all retries disabled.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Builds the retry policy described by a client config.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::default()
            .max_retries(config.retry_attempts)
            .initial_delay(config.retry_delay)
    }

    /// Sets the maximum number of retries.
    pub fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }

    /// Sets the initial delay between retries.
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the maximum delay between retries.
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Delay to wait after the failed attempt with the given index.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        match 2u32
            .checked_pow(attempt)
            .and_then(|factor| self.initial_delay.checked_mul(factor))
        {
            Some(delay) => delay.min(self.max_delay),
            None => self.max_delay,
        }
    }

    /// The full backoff schedule for `retries` retries.
    pub fn schedule(&self, retries: u32) -> Vec<Duration> {
        (0..retries).map(|attempt| self.delay_for(attempt)).collect()
    }
}
