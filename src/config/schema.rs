//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the reporting details service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Remote API config cache endpoint.
    pub api_config: ApiConfigSettings,

    /// Retry policy for the remote fetch.
    pub retry: RetryConfig,

    /// Settings handed to the flow-processing collaborator.
    pub flows: FlowsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Info endpoint and worker settings.
    pub server: ServerConfig,
}

/// Remote API config cache endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfigSettings {
    /// Base host (e.g., "https://api.platform.example").
    pub host: String,

    /// Path and query appended to the host.
    pub path: String,

    /// Value sent as `Ocp-Apim-Subscription-Key`.
    pub api_key: String,

    /// Connection establishment timeout in milliseconds.
    pub connect_timeout_millis: u64,

    /// Read timeout for a single attempt in milliseconds.
    pub read_timeout_millis: u64,
}

impl ApiConfigSettings {
    /// Full URL of the cache endpoint.
    pub fn url(&self) -> String {
        format!("{}{}", self.host, self.path)
    }
}

impl Default for ApiConfigSettings {
    fn default() -> Self {
        Self {
            host: String::new(),
            path: "/cache?keys=creditorInstitutionStations,stations".to_string(),
            api_key: String::new(),
            connect_timeout_millis: 20_000,
            read_timeout_millis: 20_000,
        }
    }
}

/// Retry configuration (exponential backoff).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Enable retries on server errors.
    pub enabled: bool,

    /// First backoff interval in milliseconds.
    pub initial_interval_millis: u64,

    /// Overall retry budget in milliseconds.
    pub max_elapsed_time_millis: u64,

    /// Upper bound for a single interval in milliseconds.
    pub max_interval_millis: u64,

    /// Growth factor between consecutive intervals.
    pub multiplier: f64,

    /// Jitter as a fraction of the current interval (0.5 = ±50%).
    pub randomization_factor: f64,
}

impl RetryConfig {
    pub fn max_elapsed_time(&self) -> Duration {
        Duration::from_millis(self.max_elapsed_time_millis)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            initial_interval_millis: 500,
            max_elapsed_time_millis: 1000,
            max_interval_millis: 1000,
            multiplier: 1.5,
            randomization_factor: 0.5,
        }
    }
}

/// Flow-processing collaborator settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FlowsConfig {
    /// Storage account connection string.
    pub storage_connection_string: String,

    /// Blob container receiving the XML flows.
    pub xml_blob: String,

    /// Queue the flow messages come from (and are re-queued to).
    pub queue: String,

    /// Table tracking downloaded flows.
    pub table: String,

    /// Maximum number of re-queue attempts downstream.
    pub max_retry_queuing: u32,

    /// Time-to-live of re-queued messages in seconds.
    pub queue_retention_sec: u64,

    /// Visibility delay of re-queued messages in seconds.
    pub queue_delay_sec: u64,
}

impl Default for FlowsConfig {
    fn default() -> Self {
        Self {
            storage_connection_string: String::new(),
            xml_blob: String::new(),
            queue: String::new(),
            table: String::new(),
            max_retry_queuing: 5,
            queue_retention_sec: 3600,
            queue_delay_sec: 60,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub log_json: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_json: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Info endpoint and worker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address of the info endpoint.
    pub bind_address: String,

    /// Maximum number of messages handled concurrently.
    pub worker_concurrency: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            worker_concurrency: 16,
        }
    }
}
