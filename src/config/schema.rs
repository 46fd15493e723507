//! Configuration schema definitions.
//!
//! This module defines the complete settings structure for the status checker.
//! All types derive Serde traits for deserialization from TOML settings files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration for the status checker.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Probe round settings.
    pub probe: ProbeConfig,

    /// Snapshot persistence settings.
    pub storage: StorageConfig,

    /// Dashboard inputs (endpoint list, static assets).
    pub dashboard: DashboardConfig,

    /// Live subscriber settings.
    pub subscribers: SubscriberConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address: "0.0.0.0:8081", "localhost:8081" or ":8081" for all interfaces.
    pub bind_address: String,
}

impl ListenerConfig {
    /// Address handed to the socket; a bare ":port" listens on every IPv4 interface.
    pub fn bind_target(&self) -> String {
        if self.bind_address.starts_with(':') {
            format!("0.0.0.0{}", self.bind_address)
        } else {
            self.bind_address.clone()
        }
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8081".to_string(),
        }
    }
}

/// Probe round configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Pause between the end of one round and the start of the next, in seconds.
    pub interval_secs: u64,

    /// Per-request probe timeout in seconds.
    pub timeout_secs: u64,

    /// User-Agent header sent with every probe.
    pub user_agent: String,
}

impl ProbeConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            interval_secs: 10,
            timeout_secs: 10,
            user_agent: concat!("status-checker/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Snapshot persistence configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Persist the snapshot after every round and restore it on startup.
    pub enabled: bool,

    /// Directory holding the snapshot file. Created on first save if missing.
    pub data_dir: PathBuf,

    /// Snapshot file name inside `data_dir`.
    pub file_name: String,
}

impl StorageConfig {
    /// Full path of the snapshot file.
    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(&self.file_name)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            data_dir: PathBuf::from("./data"),
            file_name: "status_state.json".to_string(),
        }
    }
}

/// Dashboard inputs.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// JSON file containing the array of endpoint URLs to probe.
    pub endpoints_path: PathBuf,

    /// Directory served for every path not handled by the API.
    pub static_dir: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            endpoints_path: PathBuf::from("./config.json"),
            static_dir: PathBuf::from("./static"),
        }
    }
}

/// Live subscriber configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SubscriberConfig {
    /// Snapshots queued per subscriber before it is skipped as slow.
    pub queue_capacity: usize,

    /// Maximum time a single websocket write may take before the subscriber is dropped.
    pub write_timeout_secs: u64,
}

impl SubscriberConfig {
    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_secs)
    }
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 8,
            write_timeout_secs: 5,
        }
    }
}

/// Timeout configuration for HTTP handlers.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
