//! Metrics collection and exposition.
//!
//! # Metrics
//! - `issues_proxy_requests_total` (counter): requests by route, status
//! - `issues_proxy_request_duration_seconds` (histogram): latency by route
//! - `issues_proxy_upstream_requests_total` (counter): upstream calls by status
//! - `issues_proxy_upstream_duration_seconds` (histogram): upstream latency
//! - `issues_proxy_validation_failures_total` (counter): rejected queries by parameter
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::translator::ValidationError;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one handled request.
pub fn record_request(route: &'static str, status: u16, start: Instant) {
    counter!(
        "issues_proxy_requests_total",
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("issues_proxy_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

/// Record one upstream call. `None` means no response was received.
pub fn record_upstream(status: Option<u16>, start: Instant) {
    let status = status.map_or_else(|| "error".to_string(), |s| s.to_string());
    counter!("issues_proxy_upstream_requests_total", "status" => status).increment(1);
    histogram!("issues_proxy_upstream_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record a query rejected before reaching upstream.
pub fn record_validation_failure(error: &ValidationError) {
    counter!("issues_proxy_validation_failures_total", "param" => error.param()).increment(1);
}
