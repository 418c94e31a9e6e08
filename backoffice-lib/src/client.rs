//! Main FetchClient

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::config::ClientConfig;
use crate::config::DEFAULT_TIMEOUT;
use crate::fetch::RetryConfig;

/// HTTP client bound to one resource base path.
///
/// This client is cheap to clone (uses `Arc` internally). It holds only its
/// fixed configuration; every call is independent of the others.
///
/// # Example
///
/// ```ignore
/// use backoffice_lib::FetchClient;
///
/// let client = FetchClient::builder()
///     .base_url("http://localhost:8000/api/customers")
///     .timeout(Duration::from_secs(10))
///     .build();
///
/// let table = client.get("/table").await?;
/// ```
#[derive(Clone)]
pub struct FetchClient {
    pub(crate) inner: Arc<FetchClientInner>,
}

pub(crate) struct FetchClientInner {
    pub(crate) base_url: String,
    pub(crate) http_client: Client,
    pub(crate) timeout: Duration,
    pub(crate) retry: RetryConfig,
}

impl FetchClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> FetchClientBuilder<Missing> {
        FetchClientBuilder::new()
    }

    /// Creates a client from a [`ClientConfig`].
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::builder()
            .base_url(config.base_url.clone())
            .timeout(config.timeout)
            .retry(RetryConfig::from_config(config))
            .build()
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Returns the default per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.inner.timeout
    }

    /// Returns the retry policy.
    pub fn retry_config(&self) -> &RetryConfig {
        &self.inner.retry
    }

    pub(crate) fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.inner.base_url, path)
    }
}

impl std::fmt::Debug for FetchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchClient")
            .field("base_url", &self.inner.base_url)
            .field("timeout", &self.inner.timeout)
            .field("retry", &self.inner.retry)
            .finish()
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`FetchClient`].
///
/// Uses the typestate pattern so `build()` is only reachable once the base
/// URL has been set.
pub struct FetchClientBuilder<Url> {
    url: Url,
    timeout: Duration,
    retry: RetryConfig,
    http_client: Option<Client>,
}

impl FetchClientBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            timeout: DEFAULT_TIMEOUT,
            retry: RetryConfig::default(),
            http_client: None,
        }
    }

    /// Sets the base URL, e.g. `http://localhost:8000/api/products`.
    ///
    /// A trailing slash is dropped so request paths can start with `/`.
    pub fn base_url(self, url: impl Into<String>) -> FetchClientBuilder<Set<String>> {
        let url = url.into().trim_end_matches('/').to_string();
        FetchClientBuilder {
            url: Set(url),
            timeout: self.timeout,
            retry: self.retry,
            http_client: self.http_client,
        }
    }
}

impl Default for FetchClientBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> FetchClientBuilder<U> {
    /// Sets the default per-request timeout.
    ///
    /// Defaults to 10 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry policy.
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl FetchClientBuilder<Set<String>> {
    /// Builds the [`FetchClient`].
    pub fn build(self) -> FetchClient {
        FetchClient {
            inner: Arc::new(FetchClientInner {
                base_url: self.url.0,
                http_client: self.http_client.unwrap_or_default(),
                timeout: self.timeout,
                retry: self.retry,
            }),
        }
    }
}
