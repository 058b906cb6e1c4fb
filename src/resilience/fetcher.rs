//! Resilient upstream quote fetcher.
//!
//! # Responsibilities
//! - Consult the circuit breaker before touching the network
//! - Retry failed attempts up to `max_retries` times within the caller's deadline
//! - Feed every attempt outcome back into the breaker
//! - Degrade to the configured fallback instead of failing the caller
//!
//! # Attempt outcomes
//! ```text
//! transport error / deadline  → record_failure, next attempt
//! caller drops the future     → record_failure
//! non-2xx status              → record_failure, next attempt
//! undecodable body            → record_failure, next attempt
//! bid decoded                 → record_success, return immediately
//! ```

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::config::ServiceConfig;
use crate::observability::metrics;
use crate::quoting::{extract_bid, PayloadError};
use crate::resilience::circuit_breaker::{CircuitBreaker, CircuitSnapshot};

/// Why an upstream fetch did not produce a bid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The request never produced a response (connect, reset, body read).
    #[error("no response from upstream: {0}")]
    Transport(String),

    /// The upstream answered with a non-success status.
    #[error("upstream returned status {0}")]
    Status(u16),

    /// The body did not contain a usable bid.
    #[error("invalid upstream payload: {0}")]
    Decode(#[from] PayloadError),

    /// The caller's deadline expired while the attempt was in flight.
    #[error("deadline exceeded before upstream responded")]
    DeadlineExceeded,

    /// The breaker is open and no fallback is configured.
    #[error("circuit breaker is open")]
    CircuitOpen,
}

impl FetchError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Transport(_) => "transport",
            FetchError::Status(_) => "status",
            FetchError::Decode(_) => "decode",
            FetchError::DeadlineExceeded => "deadline",
            FetchError::CircuitOpen => "circuit_open",
        }
    }
}

/// Where a returned bid came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteOrigin {
    /// Decoded from an upstream response.
    Live,
    /// Fallback served because the breaker was open; no network call was made.
    Bypassed,
    /// Fallback served after every attempt failed; carries the last error.
    Exhausted(FetchError),
}

/// A bid plus its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub bid: String,
    pub origin: QuoteOrigin,
}

impl FetchOutcome {
    pub fn live(bid: impl Into<String>) -> Self {
        Self {
            bid: bid.into(),
            origin: QuoteOrigin::Live,
        }
    }

    pub fn is_fallback(&self) -> bool {
        !matches!(self.origin, QuoteOrigin::Live)
    }

    /// The error that forced a degraded answer, if any.
    pub fn degraded_error(&self) -> Option<&FetchError> {
        match &self.origin {
            QuoteOrigin::Exhausted(err) => Some(err),
            _ => None,
        }
    }
}

/// Anything that can produce the current quote.
#[async_trait]
pub trait QuoteFetcher: Send + Sync {
    /// Fetch the current bid, finishing network work before `deadline`.
    async fn fetch(&self, deadline: Instant) -> Result<FetchOutcome, FetchError>;

    /// Breaker state, for fetchers that have one.
    fn circuit(&self) -> Option<CircuitSnapshot> {
        None
    }
}

/// Immutable fetcher settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetcherConfig {
    pub url: String,
    pub pair: String,
    pub max_retries: u32,
    pub failure_threshold: u32,
    pub cooldown: Duration,
    /// `None` surfaces errors instead of degrading.
    pub fallback: Option<String>,
}

impl From<&ServiceConfig> for FetcherConfig {
    fn from(config: &ServiceConfig) -> Self {
        Self {
            url: config.upstream.url.clone(),
            pair: config.upstream.pair.clone(),
            max_retries: config.resilience.max_retries,
            failure_threshold: config.resilience.failure_threshold,
            cooldown: Duration::from_millis(config.resilience.cooldown_ms),
            fallback: config.resilience.fallback.clone(),
        }
    }
}

/// Counts an attempt as failed when its future is dropped before it settles.
///
/// Covers callers that cancel `fetch` (client disconnect, outer request timeout) while
/// the upstream call is still pending.
struct InFlight<'a> {
    breaker: &'a CircuitBreaker,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::warn!("Fetch attempt cancelled while in flight");
            metrics::record_fetch_attempt("cancelled");
            self.breaker.record_failure(std::time::Instant::now());
        }
    }
}

/// HTTP fetcher guarded by retries and a circuit breaker.
#[derive(Debug)]
pub struct ResilientFetcher {
    config: FetcherConfig,
    breaker: CircuitBreaker,
    client: reqwest::Client,
}

impl ResilientFetcher {
    pub fn new(config: FetcherConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    /// Use a preconfigured HTTP client (proxies, TLS roots, pooling).
    pub fn with_client(config: FetcherConfig, client: reqwest::Client) -> Self {
        let breaker = CircuitBreaker::new(config.failure_threshold, config.cooldown);
        Self {
            config,
            breaker,
            client,
        }
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    fn fallback(&self, origin: QuoteOrigin) -> Option<FetchOutcome> {
        self.config.fallback.clone().map(|bid| FetchOutcome { bid, origin })
    }

    /// One GET against the upstream, bounded by `deadline`.
    async fn attempt(&self, deadline: Instant) -> Result<String, FetchError> {
        let request = async {
            let response = self
                .client
                .get(&self.config.url)
                .send()
                .await
                .map_err(|e| FetchError::Transport(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status(status.as_u16()));
            }

            let body = response
                .bytes()
                .await
                .map_err(|e| FetchError::Transport(e.to_string()))?;

            let bid = extract_bid(&body, &self.config.pair)?;
            Ok::<_, FetchError>(bid)
        };

        tokio::time::timeout_at(deadline, request)
            .await
            .map_err(|_| FetchError::DeadlineExceeded)?
    }
}

#[async_trait]
impl QuoteFetcher for ResilientFetcher {
    async fn fetch(&self, deadline: Instant) -> Result<FetchOutcome, FetchError> {
        if self.breaker.should_bypass(std::time::Instant::now()) {
            tracing::info!("Circuit breaker is open, using fallback value");
            metrics::record_fallback("circuit_open");
            return self
                .fallback(QuoteOrigin::Bypassed)
                .ok_or(FetchError::CircuitOpen);
        }

        let max_attempts = self.config.max_retries.saturating_add(1);
        let mut attempt = 0;

        let last_error = loop {
            attempt += 1;
            let mut in_flight = InFlight {
                breaker: &self.breaker,
                settled: false,
            };
            let result = self.attempt(deadline).await;
            in_flight.settled = true;

            match result {
                Ok(bid) => {
                    self.breaker.record_success();
                    metrics::record_fetch_attempt("success");
                    tracing::debug!(attempt, bid = %bid, "Fetched quote from upstream");
                    return Ok(FetchOutcome::live(bid));
                }
                Err(err) => {
                    match &err {
                        FetchError::Status(status) => tracing::warn!(
                            attempt,
                            status,
                            "Fetch attempt failed: non-success status"
                        ),
                        FetchError::Decode(e) => tracing::warn!(
                            attempt,
                            error = %e,
                            "Fetch attempt failed during decoding"
                        ),
                        FetchError::DeadlineExceeded => {
                            tracing::warn!(attempt, "Fetch attempt failed: deadline exceeded")
                        }
                        other => tracing::warn!(
                            attempt,
                            error = %other,
                            "Fetch attempt failed: no response"
                        ),
                    }
                    metrics::record_fetch_attempt(err.kind());
                    self.breaker.record_failure(std::time::Instant::now());

                    if attempt >= max_attempts {
                        break err;
                    }
                }
            }
        };

        tracing::warn!(attempts = attempt, error = %last_error, "All fetch attempts failed");
        match self.fallback(QuoteOrigin::Exhausted(last_error.clone())) {
            Some(outcome) => {
                metrics::record_fallback("exhausted");
                Ok(outcome)
            }
            None => Err(last_error),
        }
    }

    fn circuit(&self) -> Option<CircuitSnapshot> {
        Some(self.breaker.snapshot())
    }
}
