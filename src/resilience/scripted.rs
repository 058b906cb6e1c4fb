//! Scripted fetcher test double.
//!
//! Replays a queue of canned results, then keeps returning the last one.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::resilience::fetcher::{FetchError, FetchOutcome, QuoteFetcher};

/// A `QuoteFetcher` that never touches the network.
#[derive(Debug)]
pub struct ScriptedFetcher {
    script: Mutex<VecDeque<Result<FetchOutcome, FetchError>>>,
    last: Mutex<Option<Result<FetchOutcome, FetchError>>>,
    calls: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new(script: impl IntoIterator<Item = Result<FetchOutcome, FetchError>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            last: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always answer with a live bid.
    pub fn live(bid: &str) -> Self {
        Self::new([Ok(FetchOutcome::live(bid))])
    }

    /// Number of `fetch` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuoteFetcher for ScriptedFetcher {
    async fn fetch(&self, _deadline: Instant) -> Result<FetchOutcome, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let next = self
            .script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(result) = next {
            *last = Some(result);
        }
        last.clone().unwrap_or(Err(FetchError::CircuitOpen))
    }
}
