//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::Mutex;
use std::time::Duration;

use backoffice_lib::ClientConfig;
use backoffice_lib::FetchClient;
use backoffice_lib::fetch::RetryConfig;
use backoffice_lib::service::Notifier;
use backoffice_lib::service::Severity;
use serde_json::Value;
use serde_json::json;

/// Client config with fast retries so failure paths finish quickly.
pub fn fast_config(base_url: &str) -> ClientConfig {
    ClientConfig::new(base_url)
        .with_timeout(Duration::from_secs(2))
        .with_retry_attempts(3)
        .with_retry_delay(Duration::from_millis(5))
}

pub fn fast_client(base_url: &str) -> FetchClient {
    FetchClient::builder()
        .base_url(base_url)
        .timeout(Duration::from_secs(2))
        .retry(RetryConfig::default().initial_delay(Duration::from_millis(5)))
        .build()
}

pub fn customers_table() -> Value {
    json!({
        "columns": [
            {"field": "name", "label": "Name", "type": "CharField"},
            {"field": "email", "label": "Email", "type": "EmailField"},
            {"field": "is_active", "label": "Active", "type": "BooleanField"}
        ],
        "rows": [
            {"id": 1, "name": "Acme", "email": "info@acme.io", "is_active": true},
            {"id": 2, "name": "Globex", "email": "sales@globex.com", "is_active": false}
        ]
    })
}

/// Notifier that records everything it receives.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub received: Mutex<Vec<(Severity, String, String)>>,
}

impl RecordingNotifier {
    pub fn take(&self) -> Vec<(Severity, String, String)> {
        std::mem::take(&mut *self.received.lock().unwrap())
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, severity: Severity, title: &str, detail: &str) {
        self.received
            .lock()
            .unwrap()
            .push((severity, title.to_string(), detail.to_string()));
    }
}
