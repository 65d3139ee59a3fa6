//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the supervisor API.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SupervisorConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// API surface configuration.
    pub api: ApiConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// API surface configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base path every route is mounted under.
    pub base_path: String,

    /// Default page size for offset-paginated listings.
    pub page_size: i64,

    /// Default item limit for cursor-paginated listings.
    pub cursor_limit: i64,

    /// Default measurement step in seconds.
    pub step_secs: u64,

    /// Days of history "beginning" reaches back from now.
    pub history_window_days: i64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_path: "/api/v1".to_string(),
            page_size: 10,
            cursor_limit: 10,
            step_secs: 1,
            history_window_days: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
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
