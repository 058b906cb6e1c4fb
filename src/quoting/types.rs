//! Upstream quote payload types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One currency pair entry from the upstream provider.
///
/// The provider sends many more fields (high, low, timestamp...); only the bid is kept.
/// The bid stays a string so the served value is byte-identical to the upstream one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairQuote {
    pub bid: String,
}

/// Full upstream body: `{"USDBRL": {"bid": "5.43", ...}}`.
///
/// Entries are kept untyped; only the requested pair has to look like a quote.
pub type UpstreamPayload = HashMap<String, serde_json::Value>;

/// Reasons an upstream body cannot yield a bid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error("pair '{0}' missing from payload")]
    MissingPair(String),
}

/// Decode an upstream body and extract the bid for `pair`.
pub fn extract_bid(body: &[u8], pair: &str) -> Result<String, PayloadError> {
    let mut payload: UpstreamPayload =
        serde_json::from_slice(body).map_err(|e| PayloadError::Malformed(e.to_string()))?;

    let entry = payload
        .remove(pair)
        .ok_or_else(|| PayloadError::MissingPair(pair.to_string()))?;

    serde_json::from_value::<PairQuote>(entry)
        .map(|quote| quote.bid)
        .map_err(|e| PayloadError::Malformed(e.to_string()))
}
