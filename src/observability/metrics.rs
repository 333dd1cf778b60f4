//! Metrics collection and exposition.
//!
//! # Metrics
//! - `reporting_cache_refresh_total` (counter): refresh attempts by outcome
//! - `reporting_remote_fetch_attempts_total` (counter): HTTP attempts by status class
//! - `reporting_messages_total` (counter): handled messages by outcome
//!
//! Recording is a no-op until a recorder is installed.

use std::net::SocketAddr;

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_cache_refresh(outcome: &'static str) {
    counter!("reporting_cache_refresh_total", "outcome" => outcome).increment(1);
}

pub fn record_fetch_attempt(status: &'static str) {
    counter!("reporting_remote_fetch_attempts_total", "status" => status).increment(1);
}

pub fn record_message(outcome: &'static str) {
    counter!("reporting_messages_total", "outcome" => outcome).increment(1);
}
