//! Watcher configuration with TOML file support.

use serde::{Deserialize, Serialize};

use crate::WatcherError;

/// Configuration for a chainwatch instance.
///
/// Can be loaded from a TOML file via [`WatcherConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WatcherConfig {
    /// JSON-RPC endpoint of the chain node to follow.
    #[serde(default = "default_node_url")]
    pub node_url: String,

    /// Seconds between poll cycles.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Per-request gateway timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Port for the HTTP API.
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Whether to serve the Prometheus /metrics endpoint.
    #[serde(default)]
    pub enable_metrics: bool,

    /// Whether a new subscription immediately scans the latest block, so a
    /// fresh subscriber sees activity without waiting a full poll interval.
    #[serde(default = "default_true")]
    pub catch_up_on_subscribe: bool,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_node_url() -> String {
    "https://ethereum-rpc.publicnode.com".to_string()
}

fn default_poll_interval() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    10
}

fn default_api_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl WatcherConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, WatcherError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| WatcherError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, WatcherError> {
        toml::from_str(s).map_err(|e| WatcherError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("WatcherConfig is always serializable to TOML")
    }
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            node_url: default_node_url(),
            poll_interval_secs: default_poll_interval(),
            request_timeout_secs: default_request_timeout(),
            api_port: default_api_port(),
            enable_metrics: false,
            catch_up_on_subscribe: default_true(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}
