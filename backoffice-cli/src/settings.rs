//! CLI settings file

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use backoffice_lib::ClientConfig;
use backoffice_lib::config::DEFAULT_RETRY_ATTEMPTS;
use backoffice_lib::config::DEFAULT_RETRY_DELAY;
use backoffice_lib::config::DEFAULT_TIMEOUT;
use backoffice_lib::table::DEFAULT_PAGE_SIZE;
use serde::Deserialize;
use serde::Serialize;

use crate::paths;

/// Environment variable overriding `api_origin`.
pub const API_ORIGIN_ENV: &str = "BACKOFFICE_API_ORIGIN";

const DEFAULT_API_ORIGIN: &str = "http://localhost:8000";

/// Contents of `settings.json`. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_origin: String,
    pub timeout_ms: u64,
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
    pub page_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_origin: DEFAULT_API_ORIGIN.to_string(),
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_delay_ms: DEFAULT_RETRY_DELAY.as_millis() as u64,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Settings {
    /// Loads settings from the config directory, then applies the
    /// environment override.
    pub fn load() -> anyhow::Result<Self> {
        let settings = match paths::settings_file() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        Ok(settings.with_origin_override(std::env::var(API_ORIGIN_ENV).ok()))
    }

    /// Reads a settings file; a missing file yields defaults.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            log::debug!("no settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let settings = serde_json::from_str(&text)
            .with_context(|| format!("invalid settings in {}", path.display()))?;
        log::debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    fn with_origin_override(mut self, origin: Option<String>) -> Self {
        if let Some(origin) = origin.filter(|o| !o.trim().is_empty()) {
            self.api_origin = origin;
        }
        self
    }

    /// Client settings shared by every resource; the base URL is filled in
    /// per resource.
    pub fn client_template(&self) -> ClientConfig {
        ClientConfig::new(self.api_origin.clone())
            .with_timeout(Duration::from_millis(self.timeout_ms))
            .with_retry_attempts(self.retry_attempts)
            .with_retry_delay(Duration::from_millis(self.retry_delay_ms))
    }
}
