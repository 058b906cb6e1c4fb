//! FX quote service library.
//!
//! Fetches the USD→BRL bid from an upstream provider behind bounded retries and a
//! circuit breaker, persists it, and serves it over HTTP.

pub mod client;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod quoting;
pub mod resilience;
pub mod storage;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use resilience::{QuoteFetcher, ResilientFetcher};
pub use storage::QuoteStore;
