//! Metrics collection and exposition.
//!
//! # Metrics
//! - `shell_page_renders_total` (counter): pages served by route, status
//! - `shell_navigation_events_total` (counter): session events by kind
//! - `shell_api_requests_total` (counter): gateway requests by endpoint, status
//! - `shell_api_request_duration_seconds` (histogram): gateway latency
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_page_render(route: &str, status: u16) {
    counter!(
        "shell_page_renders_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

pub fn record_navigation(kind: &'static str) {
    counter!("shell_navigation_events_total", "kind" => kind).increment(1);
}

pub fn record_api_request(endpoint: &'static str, status: u16, start: Instant) {
    counter!(
        "shell_api_requests_total",
        "endpoint" => endpoint,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("shell_api_request_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}
