//! User-facing notifications

use serde::Serialize;

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

/// Receives short user-facing messages (toasts, status lines).
pub trait Notifier: Send + Sync {
    fn notify(&self, severity: Severity, title: &str, detail: &str);
}

/// Writes notifications to the log at a level matching their severity.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, severity: Severity, title: &str, detail: &str) {
        match severity {
            Severity::Error => log::error!("{}: {}", title, detail),
            Severity::Warning => log::warn!("{}: {}", title, detail),
            Severity::Success | Severity::Info => log::info!("{}: {}", title, detail),
        }
    }
}
