//! Quote persistence subsystem.
//!
//! # Data Flow
//! ```text
//! Request handler (fetched bid)
//!     → QuoteStore::save (under the handler's save deadline)
//!     → sqlite.rs (production) / memory.rs (tests, dry runs)
//! ```
//!
//! # Design Decisions
//! - Persistence errors are never absorbed; the handler turns them into a 500
//! - Storage failures do not touch circuit breaker state
//! - Schema is created on connect

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

pub use memory::MemoryQuoteStore;
pub use sqlite::SqliteQuoteStore;

/// Errors that can occur while persisting quotes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// Could not open the database.
    #[error("Database connection error: {0}")]
    Connection(String),

    /// Statement failed.
    #[error("Query error: {0}")]
    Query(String),

    /// The save deadline expired.
    #[error("Save timed out after {0} ms")]
    Timeout(u64),
}

/// Anything that can persist a fetched bid.
#[async_trait]
pub trait QuoteStore: Send + Sync {
    async fn save(&self, bid: &str) -> Result<(), StorageError>;
}
