//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! fetcher, breaker, handler produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Breaker transitions are only visible here, never as errors
//! - Request ID flows through the HTTP layer into every log line of a request
//! - Metrics are optional and disabled by default

pub mod logging;
pub mod metrics;
