//! Circuit breaker guarding the upstream quote provider.
//!
//! # States
//! - Closed: normal operation, calls pass through
//! - Open: upstream assumed down, callers get the fallback without a network call
//!
//! # State Transitions
//! ```text
//! Closed → Open: failure_count >= failure_threshold
//! Open → Closed: cooldown elapsed (checked by should_bypass), failure_count cleared
//! Any → Closed: a successful fetch
//! ```
//!
//! There is no separate half-open state. The call that observes the elapsed cooldown
//! closes the breaker and proceeds like any call from Closed.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::observability::metrics;

/// Externally visible breaker condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    Closed,
    Open,
}

/// Point-in-time copy of the breaker, for health reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CircuitSnapshot {
    pub state: CircuitState,
    pub failure_count: u32,
}

#[derive(Debug, Default)]
struct CircuitInner {
    failure_count: u32,
    is_open: bool,
    last_opened_at: Option<Instant>,
}

/// Thread-safe consecutive-failure circuit breaker.
///
/// Every mutation happens under one mutex and the lock is never held across an await.
#[derive(Debug)]
pub struct CircuitBreaker {
    failure_threshold: u32,
    cooldown: Duration,
    inner: Mutex<CircuitInner>,
}

impl CircuitBreaker {
    /// Create a closed breaker.
    ///
    /// A threshold of 0 is treated as 1.
    pub fn new(failure_threshold: u32, cooldown: Duration) -> Self {
        Self {
            failure_threshold: failure_threshold.max(1),
            cooldown,
            inner: Mutex::new(CircuitInner::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CircuitInner> {
        // Plain counters; a panicking holder cannot leave them half-written.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns true while the breaker is open and the cooldown has not elapsed.
    ///
    /// When the breaker is open but the cooldown has elapsed, this closes it and clears
    /// the failure count so the current call goes through as a trial.
    pub fn should_bypass(&self, now: Instant) -> bool {
        let mut inner = self.lock();
        if !inner.is_open {
            return false;
        }

        let opened_at = inner.last_opened_at.unwrap_or(now);
        if now.saturating_duration_since(opened_at) < self.cooldown {
            return true;
        }

        inner.is_open = false;
        inner.failure_count = 0;
        drop(inner);

        tracing::info!(
            cooldown_ms = self.cooldown.as_millis() as u64,
            "Circuit breaker reset after cooldown"
        );
        metrics::record_circuit_state(CircuitState::Closed);
        false
    }

    /// Count one failed upstream attempt.
    ///
    /// At or above the threshold the breaker is (re)opened and `now` becomes the start of
    /// the cooldown. Returns true only when this failure opened a closed breaker.
    pub fn record_failure(&self, now: Instant) -> bool {
        let mut inner = self.lock();
        inner.failure_count = inner.failure_count.saturating_add(1);
        if inner.failure_count < self.failure_threshold {
            return false;
        }

        let was_open = inner.is_open;
        inner.is_open = true;
        inner.last_opened_at = Some(now);
        let failures = inner.failure_count;
        drop(inner);

        if was_open {
            return false;
        }

        tracing::warn!(
            failures,
            threshold = self.failure_threshold,
            "Circuit breaker opened"
        );
        metrics::record_circuit_state(CircuitState::Open);
        true
    }

    /// Close the breaker and clear the failure count.
    pub fn record_success(&self) {
        let mut inner = self.lock();
        let was_open = inner.is_open;
        inner.failure_count = 0;
        inner.is_open = false;
        drop(inner);

        if was_open {
            tracing::info!("Circuit breaker closed after successful fetch");
            metrics::record_circuit_state(CircuitState::Closed);
        }
    }

    pub fn snapshot(&self) -> CircuitSnapshot {
        let inner = self.lock();
        CircuitSnapshot {
            state: if inner.is_open {
                CircuitState::Open
            } else {
                CircuitState::Closed
            },
            failure_count: inner.failure_count,
        }
    }

    pub fn failure_threshold(&self) -> u32 {
        self.failure_threshold
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }
}
