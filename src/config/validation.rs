//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and formats.
//! Every problem is collected so a bad file is reported in one pass.

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::ServiceConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    match Url::parse(&config.upstream.url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::new(
            "upstream.url",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new("upstream.url", e.to_string())),
    }

    if config.upstream.pair.trim().is_empty() {
        errors.push(ValidationError::new("upstream.pair", "must not be empty"));
    }

    if config.resilience.failure_threshold == 0 {
        errors.push(ValidationError::new(
            "resilience.failure_threshold",
            "must be at least 1",
        ));
    }

    if let Some(fallback) = &config.resilience.fallback {
        if fallback.trim().is_empty() {
            errors.push(ValidationError::new(
                "resilience.fallback",
                "must not be empty when set",
            ));
        }
    }

    if config.timeouts.fetch_ms == 0 {
        errors.push(ValidationError::new("timeouts.fetch_ms", "must be greater than 0"));
    }
    if config.timeouts.save_ms == 0 {
        errors.push(ValidationError::new("timeouts.save_ms", "must be greater than 0"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new(
            "timeouts.request_secs",
            "must be greater than 0",
        ));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "'{}' is not a socket address",
                config.observability.metrics_address
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
