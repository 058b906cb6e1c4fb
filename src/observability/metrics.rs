//! Metrics collection and exposition.
//!
//! # Metrics
//! - `quote_requests_total` (counter): handled requests by status
//! - `quote_request_duration_seconds` (histogram): handler latency
//! - `quote_fetch_attempts_total` (counter): upstream attempts by outcome
//! - `quote_fallbacks_total` (counter): fallback answers by reason
//! - `quote_circuit_open` (gauge): 1=open, 0=closed
//!
//! Recording is a no-op until `init_metrics` installs the Prometheus recorder.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::resilience::circuit_breaker::CircuitState;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter")
        }
    }
}

pub fn record_request(status: u16, start: Instant) {
    counter!("quote_requests_total", "status" => status.to_string()).increment(1);
    histogram!("quote_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_fetch_attempt(outcome: &'static str) {
    counter!("quote_fetch_attempts_total", "outcome" => outcome).increment(1);
}

pub fn record_fallback(reason: &'static str) {
    counter!("quote_fallbacks_total", "reason" => reason).increment(1);
}

pub fn record_circuit_state(state: CircuitState) {
    let value = match state {
        CircuitState::Open => 1.0,
        CircuitState::Closed => 0.0,
    };
    gauge!("quote_circuit_open").set(value);
}
