//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the asset proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream asset store and resizer base URLs.
    pub upstreams: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream service locations.
///
/// Both hosts are required; an empty string means "not configured".
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the raw asset store (e.g., "http://assets:9000").
    pub assets_api_host: String,

    /// Base URL of the image resizing service (e.g., "http://imgproxy:8080").
    pub resizer_api_host: String,

    /// Honor `HTTP_PROXY`/`HTTPS_PROXY` for outbound requests.
    pub system_proxy: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            assets_api_host: String::new(),
            resizer_api_host: String::new(),
            system_proxy: true,
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream fetch deadline (until response headers arrive) in seconds.
    pub upstream_secs: u64,

    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Time in-flight requests get to finish after a shutdown signal.
    pub shutdown_grace_secs: u64,
}

impl TimeoutConfig {
    pub fn upstream(&self) -> Duration {
        Duration::from_secs(self.upstream_secs)
    }

    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            upstream_secs: 10,
            connect_secs: 5,
            shutdown_grace_secs: 10,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output for development.
    #[default]
    Pretty,
    /// One JSON object per line for log aggregation.
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProxyConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.timeouts.upstream(), Duration::from_secs(10));
        assert_eq!(config.timeouts.shutdown_grace(), Duration::from_secs(10));
        assert!(config.upstreams.assets_api_host.is_empty());
        assert!(config.upstreams.system_proxy);
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [upstreams]
            assets_api_host = "http://assets:9000"

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.upstreams.assets_api_host, "http://assets:9000");
        assert!(config.upstreams.resizer_api_host.is_empty());
        assert!(config.upstreams.system_proxy);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.timeouts.connect_secs, 5);
    }
}
