//! In-memory quote store.
//!
//! Used by tests and by dry runs that should not touch disk. It can be told to fail
//! or stall so the handler's error and deadline paths can be exercised.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::storage::{QuoteStore, StorageError};

#[derive(Debug, Default)]
pub struct MemoryQuoteStore {
    saved: Mutex<Vec<String>>,
    failing: AtomicBool,
    delay: Mutex<Option<Duration>>,
}

impl MemoryQuoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent save fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Stall each save by `delay` before completing.
    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock().unwrap_or_else(|e| e.into_inner()) = delay;
    }

    /// Every bid saved so far, oldest first.
    pub fn saved(&self) -> Vec<String> {
        self.saved.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl QuoteStore for MemoryQuoteStore {
    async fn save(&self, bid: &str) -> Result<(), StorageError> {
        let delay = *self.delay.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Query("store unavailable".into()));
        }

        self.saved
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(bid.to_string());
        Ok(())
    }
}
