//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, status, service
//! - `gateway_request_duration_seconds` (histogram): latency by service
//! - `gateway_rate_limited_total` (counter): rejected requests
//! - `gateway_counting_store_faults_total` (counter): store errors seen by
//!   the limiter (fail-open admissions show up here, not in errors)
//!
//! # Design Decisions
//! - Low-overhead updates (atomic operations in the recorder)
//! - Prometheus exposition on a separate listener, enabled by config

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(error = %e, "Failed to install Prometheus exporter"),
    }
}

/// Record one completed request.
pub fn record_request(method: &str, status: u16, service: &str, start: Instant) {
    metrics::counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "service" => service.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "gateway_request_duration_seconds",
        "service" => service.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a rate-limit rejection.
pub fn record_rate_limited() {
    metrics::counter!("gateway_rate_limited_total").increment(1);
}

/// Record a counting-store fault observed by the limiter.
pub fn record_store_fault() {
    metrics::counter!("gateway_counting_store_faults_total").increment(1);
}
