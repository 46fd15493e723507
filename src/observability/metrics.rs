//! Metrics collection and exposition.
//!
//! # Metrics
//! - `status_probe_total` (counter): probes by outcome
//! - `status_probe_duration_seconds` (histogram): probe latency
//! - `status_endpoint_healthy` (gauge): 1=healthy, 0=unhealthy, by url
//! - `status_rounds_total` (counter), `status_round_duration_seconds` (histogram)
//! - `status_endpoints_healthy` / `status_endpoints_total` (gauges)
//! - `status_subscribers` (gauge): connected live subscribers
//! - `status_persist_failures_total` (counter)
//!
//! Recording is a no-op until [`init_metrics`] installs the Prometheus exporter.

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_probe(outcome: &'static str, elapsed: Duration) {
    counter!("status_probe_total", "outcome" => outcome).increment(1);
    histogram!("status_probe_duration_seconds").record(elapsed.as_secs_f64());
}

pub fn record_endpoint_health(url: &str, healthy: bool) {
    gauge!("status_endpoint_healthy", "url" => url.to_string()).set(if healthy { 1.0 } else { 0.0 });
}

pub fn record_round(elapsed: Duration, healthy: usize, total: usize) {
    counter!("status_rounds_total").increment(1);
    histogram!("status_round_duration_seconds").record(elapsed.as_secs_f64());
    gauge!("status_endpoints_healthy").set(healthy as f64);
    gauge!("status_endpoints_total").set(total as f64);
}

pub fn record_subscribers(count: usize) {
    gauge!("status_subscribers").set(count as f64);
}

pub fn record_persist_failure() {
    counter!("status_persist_failures_total").increment(1);
}
