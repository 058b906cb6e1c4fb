//! SQLite-backed quote store.

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::storage::{QuoteStore, StorageError};

/// A saved quote row.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct QuoteRecord {
    pub id: i64,
    pub bid: String,
    pub created_at: String,
}

/// Quote store writing one row per served quote.
#[derive(Debug, Clone)]
pub struct SqliteQuoteStore {
    pool: SqlitePool,
}

impl SqliteQuoteStore {
    /// Open (creating if needed) the database and ensure the schema exists.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        // In-memory databases are per connection; pin them to one.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        Self::initialize_schema(&pool).await?;

        tracing::info!(database_url = %database_url, "Quote store ready");
        Ok(Self { pool })
    }

    async fn initialize_schema(pool: &SqlitePool) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS quotes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                bid TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(pool)
        .await
        .map_err(|e| StorageError::Query(e.to_string()))?;

        Ok(())
    }

    /// Most recent quotes, newest first.
    pub async fn recent(&self, limit: u32) -> Result<Vec<QuoteRecord>, StorageError> {
        sqlx::query_as::<_, QuoteRecord>(
            "SELECT id, bid, CAST(created_at AS TEXT) AS created_at FROM quotes ORDER BY id DESC LIMIT ?",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Query(e.to_string()))
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl QuoteStore for SqliteQuoteStore {
    async fn save(&self, bid: &str) -> Result<(), StorageError> {
        sqlx::query("INSERT INTO quotes (bid) VALUES (?)")
            .bind(bid)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Query(e.to_string()))?;
        Ok(())
    }
}
