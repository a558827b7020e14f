//! Configuration schema definitions.
//!
//! Every section has a `Default` matching the proxy's built-in behaviour, so an
//! empty (or absent) config file yields a working GitHub proxy on
//! `127.0.0.1:7000`.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

/// Root configuration for the issues proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream API settings.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:7000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:7000".to_string(),
        }
    }
}

/// Upstream REST API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL that `{owner}/{repo}/{resource}` is appended to.
    pub base_url: String,

    /// `User-Agent` sent upstream. GitHub rejects requests without one.
    pub user_agent: String,

    /// `Accept` header sent upstream.
    pub accept: String,

    /// Upstream request timeout in seconds. `None` keeps the client default.
    pub timeout_secs: Option<u64>,

    /// Relay the upstream status for unmapped upstream errors instead of 400.
    pub preserve_error_status: bool,

    /// Honour `HTTP_PROXY`/`HTTPS_PROXY` for upstream calls.
    pub system_proxy: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.github.com/repos/".to_string(),
            user_agent: concat!("issues-proxy/", env!("CARGO_PKG_VERSION")).to_string(),
            accept: "application/vnd.github+json".to_string(),
            timeout_secs: None,
            preserve_error_status: false,
            system_proxy: true,
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    /// Unset means requests are only bounded by the upstream client.
    pub request_secs: Option<u64>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable, for development.
    #[default]
    Pretty,
    /// One JSON object per line.
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

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: SocketAddr,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: SocketAddr::from(([127, 0, 0, 1], 9090)),
        }
    }
}
