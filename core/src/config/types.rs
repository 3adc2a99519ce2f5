use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub stream: StreamConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Scheme and host of the service, e.g. "https://app.terraform.io".
    #[serde(default = "default_api_address")]
    pub address: String,

    #[serde(default = "default_api_base_path")]
    pub base_path: String,

    /// Bearer token. Empty means no Authorization header is sent.
    #[serde(default)]
    pub token: String,

    #[serde(default = "default_api_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_api_address() -> String {
    "https://app.terraform.io".to_string()
}

fn default_api_base_path() -> String {
    "/api/v2/".to_string()
}

fn default_api_timeout_ms() -> u64 {
    30_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            address: default_api_address(),
            base_path: default_api_base_path(),
            token: String::new(),
            timeout_ms: default_api_timeout_ms(),
        }
    }
}

impl ApiConfig {
    /// Address joined with the base path, always ending in '/'.
    pub fn base_url(&self) -> String {
        let address = self.address.trim_end_matches('/');
        let path = self.base_path.trim_matches('/');
        if path.is_empty() {
            format!("{}/", address)
        } else {
            format!("{}/{}/", address, path)
        }
    }
}

/// Polling cadence of the log stream while a plan is quiet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    #[serde(default = "default_poll_min_ms")]
    pub poll_min_ms: u64,

    #[serde(default = "default_poll_max_ms")]
    pub poll_max_ms: u64,
}

fn default_poll_min_ms() -> u64 {
    500
}

fn default_poll_max_ms() -> u64 {
    2_000
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            poll_min_ms: default_poll_min_ms(),
            poll_max_ms: default_poll_max_ms(),
        }
    }
}

impl StreamConfig {
    pub fn poll_min(&self) -> Duration {
        Duration::from_millis(self.poll_min_ms)
    }

    pub fn poll_max(&self) -> Duration {
        Duration::from_millis(self.poll_max_ms.max(self.poll_min_ms))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory` (or OS temp dir if unset).
    #[serde(default)]
    pub file: bool,

    /// EnvFilter string, e.g. "warn" or "planlog_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Optional directory for log files. If empty or unset, uses OS temp dir.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: false,
            level: default_logging_level(),
            directory: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_normalizes_slashes() {
        let api = ApiConfig {
            address: "https://tfe.example.com/".to_string(),
            base_path: "api/v2".to_string(),
            ..ApiConfig::default()
        };
        assert_eq!(api.base_url(), "https://tfe.example.com/api/v2/");
    }

    #[test]
    fn poll_max_never_below_min() {
        let stream = StreamConfig {
            poll_min_ms: 800,
            poll_max_ms: 100,
        };
        assert_eq!(stream.poll_max(), Duration::from_millis(800));
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let cfg: AppConfig = toml::from_str("[stream]\npoll_min_ms = 5\n").unwrap();
        assert_eq!(cfg.stream.poll_min_ms, 5);
        assert_eq!(cfg.stream.poll_max_ms, 2_000);
        assert_eq!(cfg.api.base_path, "/api/v2/");
        assert!(cfg.logging.console);
    }
}
