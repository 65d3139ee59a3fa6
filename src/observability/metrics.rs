//! Metrics collection and exposition.
//!
//! # Metrics
//! - `supervisor_requests_total` (counter): requests by method, status
//! - `supervisor_request_duration_seconds` (histogram): dispatch latency
//! - `supervisor_active_streams` (gauge): open SSE connections
//! - `time_expression_fallback_total` (counter): malformed time
//!   expressions that resolved to "now"

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "metrics endpoint started"),
        Err(error) => tracing::error!(%error, "failed to install metrics exporter"),
    }
}

/// Record one dispatched request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "supervisor_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
    )
    .increment(1);
    metrics::histogram!(
        "supervisor_request_duration_seconds",
        "method" => method.to_string(),
        "status" => status.to_string(),
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn stream_opened() {
    metrics::gauge!("supervisor_active_streams").increment(1.0);
}

pub fn stream_closed() {
    metrics::gauge!("supervisor_active_streams").decrement(1.0);
}
