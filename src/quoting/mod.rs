//! Quote payload module.

pub mod types;

pub use types::{extract_bid, PairQuote, PayloadError, UpstreamPayload};
