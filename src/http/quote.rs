//! Quote endpoint.
//!
//! `GET /cotacao`: fetch under the fetch deadline, save under its own save deadline,
//! answer `{"Cotacao": "<bid>"}`. Either failure answers 500.
//!
//! A fallback served because the breaker is open is a normal answer. A fallback that
//! follows an exhausted retry loop is only served when `server.serve_degraded` is set.

use std::time::{Duration, Instant};

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::http::request::request_id;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::storage::StorageError;

/// Response body. The bid string is passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteResponse {
    #[serde(rename = "Cotacao")]
    pub cotacao: String,
}

fn failure(message: &'static str, start: Instant) -> Response {
    metrics::record_request(StatusCode::INTERNAL_SERVER_ERROR.as_u16(), start);
    (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
}

pub async fn get_quote(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let start = Instant::now();
    let request_id = request_id(&headers);

    let deadline = tokio::time::Instant::now() + Duration::from_millis(state.timeouts.fetch_ms);
    let outcome = match state.fetcher.fetch(deadline).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Error fetching cotacao");
            return failure("Failed to fetch cotacao", start);
        }
    };

    if let Some(e) = outcome.degraded_error() {
        if !state.server.serve_degraded {
            tracing::error!(request_id = %request_id, error = %e, "Error fetching cotacao");
            return failure("Failed to fetch cotacao", start);
        }
        tracing::warn!(
            request_id = %request_id,
            error = %e,
            fallback = %outcome.bid,
            "Serving fallback after exhausted fetch"
        );
    }

    let save_ms = state.timeouts.save_ms;
    let saved = tokio::time::timeout(Duration::from_millis(save_ms), state.store.save(&outcome.bid))
        .await
        .unwrap_or(Err(StorageError::Timeout(save_ms)));

    if let Err(e) = saved {
        tracing::error!(request_id = %request_id, error = %e, "Error saving cotacao");
        return failure("Failed to save cotacao", start);
    }

    tracing::debug!(
        request_id = %request_id,
        bid = %outcome.bid,
        fallback = outcome.is_fallback(),
        "Served cotacao"
    );
    metrics::record_request(StatusCode::OK.as_u16(), start);
    (
        StatusCode::OK,
        Json(QuoteResponse {
            cotacao: outcome.bid,
        }),
    )
        .into_response()
}
