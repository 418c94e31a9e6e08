//! Response envelope handling
//!
//! The backend answers in several shapes: `{data, message?, success}` wrappers,
//! bare `{columns, rows}` table payloads, and bare records. Errors may carry a
//! `{message, code, details}` body, a field-error map, or plain text.

use reqwest::StatusCode;
use serde_json::Value as JsonValue;
use serde_json::json;

use crate::error::ErrorDescriptor;

/// Which envelope a successful response arrived in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// `{ "data": ... }` wrapper; the inner value is returned.
    Wrapped,
    /// `{ "columns": [...], "rows": [...] }` table payload.
    Table,
    /// Anything else, returned as-is.
    Bare,
}

/// Unwraps a parsed success body into the payload callers see.
///
/// # Example
///
/// ```
/// use backoffice_lib::fetch::{unwrap_payload, PayloadShape};
/// use serde_json::json;
///
/// let (payload, shape) = unwrap_payload(json!({"data": {"id": 1}, "success": true}));
/// assert_eq!(payload, json!({"id": 1}));
/// assert_eq!(shape, PayloadShape::Wrapped);
/// ```
pub fn unwrap_payload(body: JsonValue) -> (JsonValue, PayloadShape) {
    match body {
        JsonValue::Object(mut map) => {
            if let Some(data) = map.remove("data") {
                (data, PayloadShape::Wrapped)
            } else if map.contains_key("columns") && map.contains_key("rows") {
                (JsonValue::Object(map), PayloadShape::Table)
            } else {
                (JsonValue::Object(map), PayloadShape::Bare)
            }
        }
        other => (other, PayloadShape::Bare),
    }
}

/// Keys a server error body may carry its message under, in priority order.
const MESSAGE_KEYS: [&str; 3] = ["message", "detail", "error"];

/// Builds the error descriptor for a non-2xx response.
pub(crate) fn error_from_response(status: StatusCode, body: &str, endpoint: &str) -> ErrorDescriptor {
    let fallback = format!(
        "HTTP {}: {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown Status")
    );

    let (message, code, details) = match serde_json::from_str::<JsonValue>(body) {
        Ok(JsonValue::Object(map)) => {
            let message = MESSAGE_KEYS
                .iter()
                .find_map(|key| non_empty_str(map.get(*key)))
                .map(str::to_string);
            let code = non_empty_str(map.get("code")).map(str::to_string);
            let details = match map.get("details") {
                Some(JsonValue::Null) | None => None,
                Some(details) => Some(details.clone()),
            };

            let is_envelope = message.is_some() || code.is_some() || details.is_some();
            let details = if !is_envelope && !map.is_empty() {
                // Field-level validation errors: {"email": ["Enter a valid email address."]}
                Some(json!({ "errors": map }))
            } else {
                details
            };
            (message, code, details)
        }
        Ok(JsonValue::Null) => (None, None, None),
        Ok(other) => (None, None, Some(json!({ "errors": other }))),
        Err(_) => {
            let text = body.trim();
            let message = (!text.is_empty()).then(|| text.to_string());
            (message, None, None)
        }
    };

    let mut error = ErrorDescriptor::http(status.as_u16(), code, message.unwrap_or(fallback));
    if let Some(details) = details {
        error = error.with_details(details);
    }
    error.with_endpoint(endpoint)
}

fn non_empty_str(value: Option<&JsonValue>) -> Option<&str> {
    value?.as_str().filter(|s| !s.trim().is_empty())
}
