//! Per-call request options

use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Options that override the client defaults for one call.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use backoffice_lib::fetch::RequestOptions;
/// use tokio_util::sync::CancellationToken;
///
/// let token = CancellationToken::new();
/// let options = RequestOptions::new()
///     .timeout(Duration::from_secs(2))
///     .retry_attempts(1)
///     .cancel_token(token.clone());
/// ```
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// Timeout override for each attempt.
    pub timeout: Option<Duration>,
    /// Whether failed attempts are retried at all.
    pub retry: bool,
    /// Retry count override.
    pub retry_attempts: Option<u32>,
    /// Token that aborts the call, including any pending backoff.
    pub cancel: Option<CancellationToken>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            retry: true,
            retry_attempts: None,
            cancel: None,
        }
    }
}

impl RequestOptions {
    /// Creates new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the timeout for each attempt.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Enables or disables retries.
    pub fn retry(mut self, enabled: bool) -> Self {
        self.retry = enabled;
        self
    }

    /// Disables retries.
    pub fn no_retry(self) -> Self {
        self.retry(false)
    }

    /// Overrides the number of retries.
    pub fn retry_attempts(mut self, n: u32) -> Self {
        self.retry_attempts = Some(n);
        self
    }

    /// Attaches a cancellation token.
    pub fn cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Number of retries this call is allowed, given the client default.
    pub(crate) fn effective_retries(&self, default: u32) -> u32 {
        if self.retry {
            self.retry_attempts.unwrap_or(default)
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_retries() {
        assert_eq!(RequestOptions::new().effective_retries(3), 3);
        assert_eq!(RequestOptions::new().retry_attempts(1).effective_retries(3), 1);
        assert_eq!(RequestOptions::new().no_retry().effective_retries(3), 0);
        assert_eq!(
            RequestOptions::new()
                .retry_attempts(5)
                .retry(false)
                .effective_retries(3),
            0
        );
    }
}
