use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use status_core::error::AppError;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_RECENT_COUNT: u32 = 10;
/// Largest `count` the status API accepts on `/incidents/recent`.
pub const MAX_RECENT_COUNT: u32 = 50;

pub const ENV_API_URL: &str = "STATUSBOARD_API_URL";
pub const ENV_TIMEOUT_MS: &str = "STATUSBOARD_TIMEOUT_MS";
pub const ENV_RECENT_COUNT: &str = "STATUSBOARD_RECENT_COUNT";

/// Connection settings for the status API.
///
/// Layering (lowest to highest): defaults, JSON file, environment, CLI flags.
/// Call [`ClientConfig::validate`] once all layers are applied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    pub api_url: String,
    pub timeout_ms: u64,
    pub recent_count: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            recent_count: DEFAULT_RECENT_COUNT,
        }
    }
}

pub fn clamp_recent_count(count: u32) -> u32 {
    count.clamp(1, MAX_RECENT_COUNT)
}

impl ClientConfig {
    /// Read a JSON config file. Missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            AppError::new("CONFIG_READ_FAILED", "Failed to read config file")
                .with_details(format!("path={}; err={}", path.display(), e))
        })?;
        serde_json::from_str(&text).map_err(|e| {
            AppError::new("CONFIG_INVALID", "Config file is not valid JSON for this client")
                .with_details(format!("path={}; err={}", path.display(), e))
        })
    }

    /// Apply `STATUSBOARD_*` overrides using `lookup` (usually `std::env::var`).
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api_url = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            self.timeout_ms = parse_number(ENV_TIMEOUT_MS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_RECENT_COUNT) {
            self.recent_count = parse_number(ENV_RECENT_COUNT, &raw)?;
        }
        Ok(self)
    }

    pub fn from_env() -> Result<Self, AppError> {
        Self::default().apply_env(|key| std::env::var(key).ok())
    }

    /// Normalize and check the final configuration.
    ///
    /// - `api_url` must be `http://` or `https://` with a host and no query or fragment;
    ///   trailing slashes are trimmed.
    /// - `timeout_ms` must be positive.
    /// - `recent_count` is clamped to `1..=50`.
    pub fn validate(mut self) -> Result<Self, AppError> {
        let url = self.api_url.trim().trim_end_matches('/').to_string();

        let rest = url
            .strip_prefix("http://")
            .or_else(|| url.strip_prefix("https://"))
            .ok_or_else(|| {
                AppError::new("CONFIG_INVALID", "API URL must start with http:// or https://")
                    .with_details(format!("api_url={url}"))
            })?;
        let host = rest.split('/').next().unwrap_or_default();
        if host.is_empty() || rest.contains(['?', '#']) || rest.contains(char::is_whitespace) {
            return Err(AppError::new(
                "CONFIG_INVALID",
                "API URL must have a host and no query, fragment or whitespace",
            )
            .with_details(format!("api_url={url}")));
        }

        if self.timeout_ms == 0 {
            return Err(AppError::new("CONFIG_INVALID", "Timeout must be greater than zero"));
        }

        self.api_url = url;
        self.recent_count = clamp_recent_count(self.recent_count);
        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, AppError>
where
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| {
        AppError::new("CONFIG_INVALID", format!("{key} must be a non-negative integer"))
            .with_details(format!("value={raw}; err={e}"))
    })
}
