//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the quote service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the quote service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream quote provider.
    pub upstream: UpstreamConfig,

    /// Retry and circuit breaker settings.
    pub resilience: ResilienceConfig,

    /// Deadlines for the fetch and save steps.
    pub timeouts: TimeoutConfig,

    /// Quote persistence.
    pub storage: StorageConfig,

    /// Request handler policy.
    pub server: ServerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream quote provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Full URL of the quote endpoint.
    pub url: String,

    /// Key of the currency pair in the upstream payload (e.g., "USDBRL").
    pub pair: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: "https://economia.awesomeapi.com.br/json/last/USD-BRL".to_string(),
            pair: "USDBRL".to_string(),
        }
    }
}

/// Retry and circuit breaker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResilienceConfig {
    /// Retries after the first attempt (0 = single attempt).
    pub max_retries: u32,

    /// Consecutive failures that open the circuit.
    pub failure_threshold: u32,

    /// How long the circuit stays open, in milliseconds.
    pub cooldown_ms: u64,

    /// Value served when the circuit is open or every attempt failed.
    /// Leave unset to surface the error instead.
    pub fallback: Option<String>,
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            failure_threshold: 2,
            cooldown_ms: 2_000,
            fallback: Some("1.00".to_string()),
        }
    }
}

/// Timeout configuration for the request path.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Deadline for the whole fetch (all attempts) in milliseconds.
    pub fetch_ms: u64,

    /// Deadline for persisting the quote in milliseconds.
    pub save_ms: u64,

    /// Outer request timeout enforced by the HTTP layer, in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            fetch_ms: 200,
            save_ms: 10,
            request_secs: 5,
        }
    }
}

/// Persistence configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite connection URL.
    pub database_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://cotacao.db?mode=rwc".to_string(),
        }
    }
}

/// Request handler policy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Serve (and save) the fallback when every upstream attempt failed.
    /// When false, an exhausted fetch answers 500.
    pub serve_degraded: bool,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = ServiceConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.upstream.pair, "USDBRL");
        assert_eq!(config.resilience.max_retries, 3);
        assert_eq!(config.resilience.failure_threshold, 2);
        assert_eq!(config.resilience.cooldown_ms, 2_000);
        assert_eq!(config.resilience.fallback.as_deref(), Some("1.00"));
        assert_eq!(config.timeouts.fetch_ms, 200);
        assert_eq!(config.timeouts.save_ms, 10);
        assert!(!config.server.serve_degraded);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ServiceConfig = toml::from_str(
            r#"
            [resilience]
            max_retries = 0

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.resilience.max_retries, 0);
        assert_eq!(config.resilience.failure_threshold, 2);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.upstream.pair, "USDBRL");
    }
}
