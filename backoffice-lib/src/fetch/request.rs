//! Request execution with timeout, retry and cancellation

use std::future::Future;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::ACCEPT;
use reqwest::header::CONTENT_TYPE;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tokio_util::sync::CancellationToken;

use super::RequestOptions;
use super::envelope::error_from_response;
use super::envelope::unwrap_payload;
use crate::FetchClient;
use crate::error::ErrorDescriptor;

impl FetchClient {
    // =========================================================================
    // Verb helpers
    // =========================================================================

    /// `GET` returning the normalized JSON payload.
    pub async fn get(&self, path: &str, options: RequestOptions) -> Result<JsonValue, ErrorDescriptor> {
        self.request(Method::GET, path, None::<&()>, options).await
    }

    /// `POST` with a JSON body.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> Result<JsonValue, ErrorDescriptor> {
        self.request(Method::POST, path, Some(body), options).await
    }

    /// `PUT` with a JSON body.
    pub async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> Result<JsonValue, ErrorDescriptor> {
        self.request(Method::PUT, path, Some(body), options).await
    }

    /// `DELETE`.
    pub async fn delete(&self, path: &str, options: RequestOptions) -> Result<JsonValue, ErrorDescriptor> {
        self.request(Method::DELETE, path, None::<&()>, options).await
    }

    /// `GET` decoded into `T`.
    pub async fn get_as<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ErrorDescriptor> {
        let payload = self.get(path, options).await?;
        decode(payload, path)
    }

    /// `POST` decoded into `T`.
    pub async fn post_as<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> Result<T, ErrorDescriptor> {
        let payload = self.post(path, body, options).await?;
        decode(payload, path)
    }

    // =========================================================================
    // Core request loop
    // =========================================================================

    /// Makes an HTTP request with timeout and retry logic.
    ///
    /// Each attempt is bounded by the timeout. A failed attempt is retried
    /// after an exponential backoff while retries remain; the last error is
    /// returned once they are exhausted. Cancellation through
    /// `options.cancel` stops the call at the next suspension point and is
    /// never retried.
    pub async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        options: RequestOptions,
    ) -> Result<JsonValue, ErrorDescriptor> {
        let url = self.build_url(path);
        let timeout = options.timeout.unwrap_or(self.inner.timeout);
        let retries = options.effective_retries(self.inner.retry.max_retries);
        let cancel = options.cancel.as_ref();

        let body = match body {
            Some(body) => Some(serde_json::to_string(body).map_err(|e| {
                ErrorDescriptor::unknown(path, format!("Failed to serialize request body: {}", e))
            })?),
            None => None,
        };

        let mut attempt: u32 = 0;
        loop {
            log::debug!("{} {} (attempt {}/{})", method, url, attempt + 1, retries + 1);

            let error = match self
                .send_request_inner(&method, &url, path, body.as_deref(), timeout, cancel)
                .await
            {
                Ok(payload) => return Ok(payload),
                Err(error) => error,
            };

            if error.is_cancelled() || attempt >= retries {
                if error.is_cancelled() {
                    log::debug!("{} {} cancelled", method, url);
                } else {
                    log::error!("{} {} failed after {} attempt(s): {}", method, url, attempt + 1, error);
                }
                return Err(error);
            }

            let delay = self.inner.retry.delay_for(attempt);
            log::warn!(
                "{} {} failed ({}), retrying in {:?} ({} of {})",
                method,
                url,
                error.code,
                delay,
                attempt + 1,
                retries
            );

            if cancellable(cancel, tokio::time::sleep(delay)).await.is_none() {
                return Err(ErrorDescriptor::cancelled(path));
            }
            attempt += 1;
        }
    }

    /// One attempt without retry logic.
    async fn send_request_inner(
        &self,
        method: &Method,
        url: &str,
        path: &str,
        body: Option<&str>,
        timeout: Duration,
        cancel: Option<&CancellationToken>,
    ) -> Result<JsonValue, ErrorDescriptor> {
        let mut request = self
            .inner
            .http_client
            .request(method.clone(), url)
            .headers(default_headers())
            .timeout(timeout);

        if let Some(body) = body {
            request = request.body(body.to_string());
        }

        let response = cancellable(cancel, request.send())
            .await
            .ok_or_else(|| ErrorDescriptor::cancelled(path))?
            .map_err(|e| classify(&e, path))?;

        let status = response.status();
        let text = cancellable(cancel, response.text())
            .await
            .ok_or_else(|| ErrorDescriptor::cancelled(path))?
            .map_err(|e| classify(&e, path))?;

        if !status.is_success() {
            return Err(error_from_response(status, &text, path));
        }

        if text.trim().is_empty() {
            return Ok(JsonValue::Null);
        }

        let parsed: JsonValue = serde_json::from_str(&text).map_err(|e| {
            ErrorDescriptor::unknown(path, format!("Response parse error: {}", e))
        })?;

        let (payload, shape) = unwrap_payload(parsed);
        log::debug!("{} {} -> {} ({:?} payload)", method, url, status.as_u16(), shape);
        Ok(payload)
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

/// Maps a transport error onto the error taxonomy.
fn classify(error: &reqwest::Error, path: &str) -> ErrorDescriptor {
    let described = if error.is_timeout() {
        ErrorDescriptor::timeout(path)
    } else if error.is_connect() || error.is_request() {
        ErrorDescriptor::network(path)
    } else {
        return ErrorDescriptor::unknown(path, error.to_string());
    };
    described.with_detail("cause", error.to_string())
}

fn decode<T: DeserializeOwned>(payload: JsonValue, path: &str) -> Result<T, ErrorDescriptor> {
    serde_json::from_value(payload)
        .map_err(|e| ErrorDescriptor::unknown(path, format!("Response parse error: {}", e)))
}

/// Runs `fut` unless `cancel` fires first. `None` means cancelled.
async fn cancellable<F: Future>(cancel: Option<&CancellationToken>, fut: F) -> Option<F::Output> {
    match cancel {
        Some(token) => tokio::select! {
            biased;
            _ = token.cancelled() => None,
            output = fut => Some(output),
        },
        None => Some(fut.await),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cancellable_passes_output_through() {
        assert_eq!(cancellable(None, async { 7 }).await, Some(7));

        let token = CancellationToken::new();
        assert_eq!(cancellable(Some(&token), async { 7 }).await, Some(7));
    }

    #[tokio::test]
    async fn test_cancellable_stops_on_cancel() {
        let token = CancellationToken::new();
        token.cancel();
        let result = cancellable(Some(&token), std::future::pending::<()>()).await;
        assert!(result.is_none());
    }

    #[test]
    fn test_decode_failure_is_unknown_error() {
        let err = decode::<Vec<String>>(serde_json::json!({"a": 1}), "/table").unwrap_err();
        assert_eq!(err.code, crate::error::UNKNOWN_ERROR);
        assert_eq!(err.endpoint(), Some("/table"));
    }
}
