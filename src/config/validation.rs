//! Configuration validation.
//!
//! Serde handles the syntactic side; this checks value ranges and that the
//! remote endpoint forms a usable URL. All errors are returned, not just the
//! first one.

use thiserror::Error;

use crate::config::schema::ServiceConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("api_config.host is not set")]
    MissingHost,

    #[error("cache endpoint '{url}' is not a valid URL: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("retry.{field} must be greater than zero")]
    ZeroInterval { field: &'static str },

    #[error("retry.max_interval_millis ({max}) is below retry.initial_interval_millis ({initial})")]
    IntervalOrder { initial: u64, max: u64 },

    #[error("retry.multiplier must be >= 1.0, got {0}")]
    Multiplier(f64),

    #[error("retry.randomization_factor must be within [0, 1), got {0}")]
    RandomizationFactor(f64),

    #[error("server.worker_concurrency must be greater than zero")]
    ZeroConcurrency,
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.api_config.host.trim().is_empty() {
        errors.push(ValidationError::MissingHost);
    } else {
        let url = config.api_config.url();
        if let Err(e) = url::Url::parse(&url) {
            errors.push(ValidationError::InvalidUrl {
                url,
                reason: e.to_string(),
            });
        }
    }

    // Backoff settings are only read when retries are on.
    let retry = &config.retry;
    if retry.enabled {
        if retry.initial_interval_millis == 0 {
            errors.push(ValidationError::ZeroInterval {
                field: "initial_interval_millis",
            });
        }
        if retry.max_interval_millis == 0 {
            errors.push(ValidationError::ZeroInterval {
                field: "max_interval_millis",
            });
        }
        if retry.max_interval_millis < retry.initial_interval_millis {
            errors.push(ValidationError::IntervalOrder {
                initial: retry.initial_interval_millis,
                max: retry.max_interval_millis,
            });
        }
        if !(retry.multiplier >= 1.0) {
            errors.push(ValidationError::Multiplier(retry.multiplier));
        }
        if !(0.0..1.0).contains(&retry.randomization_factor) {
            errors.push(ValidationError::RandomizationFactor(
                retry.randomization_factor,
            ));
        }
    }

    if config.server.worker_concurrency == 0 {
        errors.push(ValidationError::ZeroConcurrency);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
