//! Metrics collection and exposition.
//!
//! # Metrics
//! - `asset_proxy_requests_total` (counter): requests by status and upstream kind
//! - `asset_proxy_request_duration_seconds` (histogram): time to response headers
//! - `asset_proxy_upstream_errors_total` (counter): failed fetches by reason
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a finished request.
pub fn record_request(status: u16, upstream: &'static str, start_time: Instant) {
    ::metrics::counter!(
        "asset_proxy_requests_total",
        "status" => status.to_string(),
        "upstream" => upstream
    )
    .increment(1);
    ::metrics::histogram!(
        "asset_proxy_request_duration_seconds",
        "upstream" => upstream
    )
    .record(start_time.elapsed().as_secs_f64());
}

/// Record a failed upstream fetch.
pub fn record_upstream_error(reason: &'static str) {
    ::metrics::counter!("asset_proxy_upstream_errors_total", "reason" => reason).increment(1);
}
