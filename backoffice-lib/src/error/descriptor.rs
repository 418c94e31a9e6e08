//! Normalized request failure

use serde::Serialize;
use serde_json::Map;
use serde_json::Value as JsonValue;

/// Code for a request that did not answer within its timeout.
pub const TIMEOUT: &str = "TIMEOUT";
/// Code for a request that could not reach the host.
pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
/// Code for failures that fit no other category.
pub const UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";
/// Code for a request aborted through its cancellation token.
pub const CANCELLED: &str = "CANCELLED";

/// The category a failure was classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No response within the timeout.
    Timeout,
    /// Transport failure (DNS, refused connection, reset).
    Network,
    /// The server answered with a non-2xx status.
    Http {
        /// HTTP status code.
        status: u16,
    },
    /// The caller cancelled the request.
    Cancelled,
    /// Anything else (undecodable body, invalid URL, ...).
    Unknown,
}

/// The one error shape every fetch failure is reported as.
///
/// Callers never see transport error types; they get a message, a stable
/// code and optional structured details. `details.endpoint` always holds the
/// request path.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("{code}: {message}")]
pub struct ErrorDescriptor {
    /// Human-readable message.
    pub message: String,
    /// Stable code, e.g. `TIMEOUT` or `HTTP_404` or a server-supplied code.
    pub code: String,
    /// Structured context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<JsonValue>,
    /// Classification the code was derived from.
    #[serde(skip)]
    pub kind: ErrorKind,
}

impl ErrorDescriptor {
    /// Creates a descriptor with no details.
    pub fn new(kind: ErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            details: None,
            kind,
        }
    }

    /// Request timed out.
    pub fn timeout(endpoint: &str) -> Self {
        Self::new(ErrorKind::Timeout, TIMEOUT, "Request timeout").with_endpoint(endpoint)
    }

    /// Host unreachable.
    pub fn network(endpoint: &str) -> Self {
        Self::new(
            ErrorKind::Network,
            NETWORK_ERROR,
            "Network error - unable to connect to server",
        )
        .with_endpoint(endpoint)
    }

    /// Request cancelled by its caller.
    pub fn cancelled(endpoint: &str) -> Self {
        Self::new(ErrorKind::Cancelled, CANCELLED, "Request cancelled").with_endpoint(endpoint)
    }

    /// Unclassified failure, keeping the original message.
    pub fn unknown(endpoint: &str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unknown, UNKNOWN_ERROR, message).with_endpoint(endpoint)
    }

    /// Non-2xx response.
    ///
    /// `code` falls back to `HTTP_<status>` when the server sent none.
    pub fn http(status: u16, code: Option<String>, message: impl Into<String>) -> Self {
        let code = code.unwrap_or_else(|| format!("HTTP_{}", status));
        Self::new(ErrorKind::Http { status }, code, message)
    }

    /// Sets the details payload.
    pub fn with_details(mut self, details: JsonValue) -> Self {
        self.details = Some(details);
        self
    }

    /// Adds one key to the details object, creating it if needed.
    pub fn with_detail(mut self, key: &str, value: impl Into<JsonValue>) -> Self {
        let mut map = match self.details.take() {
            Some(JsonValue::Object(map)) => map,
            Some(other) => {
                let mut map = Map::new();
                map.insert("context".to_string(), other);
                map
            }
            None => Map::new(),
        };
        map.insert(key.to_string(), value.into());
        self.details = Some(JsonValue::Object(map));
        self
    }

    /// Records the request path under `details.endpoint`.
    ///
    /// Object details are extended in place. Any other details value is moved
    /// under `details.context`.
    pub fn with_endpoint(self, endpoint: &str) -> Self {
        self.with_detail("endpoint", endpoint)
    }

    /// Returns the request path recorded in the details.
    pub fn endpoint(&self) -> Option<&str> {
        self.details.as_ref()?.get("endpoint")?.as_str()
    }

    /// Returns the HTTP status code if this is an HTTP error.
    pub fn status_code(&self) -> Option<u16> {
        match self.kind {
            ErrorKind::Http { status } => Some(status),
            _ => None,
        }
    }

    /// Returns `true` if the caller cancelled the request.
    pub fn is_cancelled(&self) -> bool {
        self.kind == ErrorKind::Cancelled
    }

    /// Returns `true` if the request timed out.
    pub fn is_timeout(&self) -> bool {
        self.kind == ErrorKind::Timeout
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_http_code_fallback() {
        let err = ErrorDescriptor::http(503, None, "HTTP 503: Service Unavailable");
        assert_eq!(err.code, "HTTP_503");
        assert_eq!(err.status_code(), Some(503));

        let err = ErrorDescriptor::http(400, Some("VALIDATION".into()), "Invalid email");
        assert_eq!(err.code, "VALIDATION");
        assert_eq!(err.to_string(), "VALIDATION: Invalid email");
    }

    #[test]
    fn test_endpoint_merges_into_object_details() {
        let err = ErrorDescriptor::http(400, None, "bad")
            .with_details(json!({"field": "email"}))
            .with_endpoint("/table");

        assert_eq!(err.endpoint(), Some("/table"));
        assert_eq!(err.details.as_ref().unwrap()["field"], "email");
    }

    #[test]
    fn test_endpoint_wraps_scalar_details() {
        let err = ErrorDescriptor::http(400, None, "bad")
            .with_details(json!("raw"))
            .with_endpoint("/table");

        let details = err.details.unwrap();
        assert_eq!(details["context"], "raw");
        assert_eq!(details["endpoint"], "/table");
    }

    #[test]
    fn test_transport_constructors() {
        assert_eq!(ErrorDescriptor::timeout("/t").code, TIMEOUT);
        assert!(ErrorDescriptor::timeout("/t").is_timeout());
        assert_eq!(ErrorDescriptor::network("/t").code, NETWORK_ERROR);
        assert_eq!(ErrorDescriptor::unknown("/t", "boom").message, "boom");
        assert!(ErrorDescriptor::cancelled("/t").is_cancelled());
    }

    #[test]
    fn test_serialized_shape() {
        let err = ErrorDescriptor::network("/table");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "NETWORK_ERROR");
        assert_eq!(json["details"]["endpoint"], "/table");
        assert!(json.get("kind").is_none());
    }
}
