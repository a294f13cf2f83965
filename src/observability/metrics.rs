//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define framework metrics (requests, latency, loader failures, cache)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `river_requests_total` (counter): requests by mode, status
//! - `river_request_duration_seconds` (histogram): latency by mode
//! - `river_loader_errors_total` (counter): failed segment tasks by pattern
//! - `river_route_cache_misses_total` (counter): metadata cache misses
//! - `river_route_cache_size` (gauge): cached route chains
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   exporter every call is a no-op
//! - Labels stay low-cardinality: route patterns, never concrete paths

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one completed request. `mode` is "html", "json" or "action".
pub fn record_request(mode: &'static str, status: u16, start: Instant) {
    counter!("river_requests_total", "mode" => mode, "status" => status.to_string()).increment(1);
    histogram!("river_request_duration_seconds", "mode" => mode).record(start.elapsed().as_secs_f64());
}

pub fn record_loader_error(pattern: &str) {
    counter!("river_loader_errors_total", "pattern" => pattern.to_string()).increment(1);
}

pub fn record_route_cache_miss() {
    counter!("river_route_cache_misses_total").increment(1);
}

pub fn record_route_cache_size(size: usize) {
    gauge!("river_route_cache_size").set(size as f64);
}
