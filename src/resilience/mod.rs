//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Quote request:
//!     → circuit_breaker.rs (bypass upstream while open, serve fallback)
//!     → fetcher.rs (bounded retries, each attempt under the caller's deadline)
//!     → circuit_breaker.rs (record success / failure of every attempt)
//! ```
//!
//! # Design Decisions
//! - Every upstream call has a deadline; expiry counts as a failure
//! - Retries are per call, never coordinated across concurrent callers
//! - Breaker state lives behind one mutex, never held across the network call
//! - Fallbacks are a soft degradation: the error travels with the value

pub mod circuit_breaker;
pub mod fetcher;
pub mod scripted;

pub use circuit_breaker::{CircuitBreaker, CircuitSnapshot, CircuitState};
pub use fetcher::{
    FetchError, FetchOutcome, FetcherConfig, QuoteFetcher, QuoteOrigin, ResilientFetcher,
};
pub use scripted::ScriptedFetcher;
