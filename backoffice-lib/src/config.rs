//! Client configuration

use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Default number of retries after the first attempt.
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
/// Default base delay for exponential backoff.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Fixed configuration of one [`FetchClient`](crate::FetchClient).
///
/// Durations are (de)serialized as milliseconds.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use backoffice_lib::ClientConfig;
///
/// let config: ClientConfig =
///     serde_json::from_str(r#"{"base_url": "http://localhost:8000/api/products"}"#).unwrap();
/// assert_eq!(config.timeout, Duration::from_secs(10));
/// assert_eq!(config.retry_attempts, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL every request path is appended to.
    pub base_url: String,

    /// Per-request timeout.
    ///
    /// Default: 10 seconds
    #[serde(default = "default_timeout", rename = "timeout_ms", with = "millis")]
    pub timeout: Duration,

    /// Retries after the initial attempt.
    ///
    /// Default: 3
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Base delay of the exponential backoff.
    ///
    /// Default: 1 second
    #[serde(default = "default_retry_delay", rename = "retry_delay_ms", with = "millis")]
    pub retry_delay: Duration,
}

impl ClientConfig {
    /// Creates a config with default timeout and retry settings.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the number of retries.
    pub fn with_retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = attempts;
        self
    }

    /// Sets the backoff base delay.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

fn default_retry_attempts() -> u32 {
    DEFAULT_RETRY_ATTEMPTS
}

fn default_retry_delay() -> Duration {
    DEFAULT_RETRY_DELAY
}

mod millis {
    use std::time::Duration;

    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
