//! Health endpoint.
//!
//! `GET /health` reports liveness, the crate version and, when the fetcher has one,
//! the circuit breaker snapshot.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::http::server::AppState;
use crate::resilience::CircuitSnapshot;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    /// Absent when the configured fetcher has no breaker.
    pub circuit: Option<CircuitSnapshot>,
}

pub async fn get_health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        circuit: state.fetcher.circuit(),
    })
}
