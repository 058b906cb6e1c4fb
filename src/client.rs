//! Client for the quote service.
//!
//! Performs one deadline-bounded GET, decodes the quote and writes it to a file.
//! Failures are returned to the caller; nothing is retried here.

use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Service response as seen by the client.
///
/// The service sends `Cotacao`; both spellings are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CotacaoResponse {
    #[serde(alias = "Cotacao")]
    pub cotacao: String,
}

/// Errors from a client poll.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("service returned status {0}")]
    Status(u16),

    #[error("no answer within {0} ms")]
    Timeout(u64),

    #[error("invalid response body: {0}")]
    Decode(String),

    #[error("failed to write quote file: {0}")]
    Io(#[from] std::io::Error),
}

pub struct QuoteClient {
    client: Client,
    url: String,
    timeout: Duration,
}

impl QuoteClient {
    pub fn new(url: &str, timeout: Duration) -> Self {
        Self::with_client(Client::new(), url, timeout)
    }

    pub fn with_client(client: Client, url: &str, timeout: Duration) -> Self {
        Self {
            client,
            url: url.to_string(),
            timeout,
        }
    }

    /// Fetch the current quote from the service.
    pub async fn fetch_quote(&self) -> Result<String, ClientError> {
        let request = async {
            let resp = self
                .client
                .get(&self.url)
                .send()
                .await
                .map_err(|e| ClientError::Request(e.to_string()))?;

            let status = resp.status();
            if !status.is_success() {
                return Err(ClientError::Status(status.as_u16()));
            }

            let text = resp
                .text()
                .await
                .map_err(|e| ClientError::Request(e.to_string()))?;

            serde_json::from_str::<CotacaoResponse>(&text)
                .map(|body| body.cotacao)
                .map_err(|e| ClientError::Decode(e.to_string()))
        };

        tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| ClientError::Timeout(self.timeout.as_millis() as u64))?
    }
}

/// Write `Dólar: <bid>` to `path`, replacing any previous content.
pub async fn write_quote_file(path: &Path, bid: &str) -> Result<(), ClientError> {
    tokio::fs::write(path, format!("Dólar: {bid}")).await?;
    Ok(())
}
