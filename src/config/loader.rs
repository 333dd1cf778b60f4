//! Configuration loading from disk or from the environment.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::config::env::ReadEnv;
use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ServiceConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build and validate configuration from environment-style lookups.
///
/// Missing keys fall back to the schema defaults; present but unparseable
/// values are rejected.
pub fn from_env<E: ReadEnv>(env: &E) -> Result<ServiceConfig, ConfigError> {
    let defaults = ServiceConfig::default();
    let mut config = ServiceConfig::default();

    let api = &mut config.api_config;
    api.host = string_var(env, "CACHE_CLIENT_HOST", &defaults.api_config.host);
    api.path = string_var(env, "CACHE_PATH", &defaults.api_config.path);
    api.api_key = string_var(env, "CACHE_API_KEY", &defaults.api_config.api_key);
    api.connect_timeout_millis = parse_var(
        env,
        "CACHE_CONNECT_TIMEOUT_MILLIS",
        defaults.api_config.connect_timeout_millis,
    )?;
    api.read_timeout_millis = parse_var(
        env,
        "CACHE_READ_TIMEOUT_MILLIS",
        defaults.api_config.read_timeout_millis,
    )?;

    let retry = &mut config.retry;
    retry.enabled = bool_var(env, "ENABLE_CLIENT_RETRY", defaults.retry.enabled);
    retry.initial_interval_millis = parse_var(
        env,
        "INITIAL_INTERVAL_MILLIS",
        defaults.retry.initial_interval_millis,
    )?;
    retry.max_elapsed_time_millis = parse_var(
        env,
        "MAX_ELAPSED_TIME_MILLIS",
        defaults.retry.max_elapsed_time_millis,
    )?;
    retry.max_interval_millis =
        parse_var(env, "MAX_INTERVAL_MILLIS", defaults.retry.max_interval_millis)?;
    retry.multiplier = parse_var(env, "MULTIPLIER", defaults.retry.multiplier)?;
    retry.randomization_factor = parse_var(
        env,
        "RANDOMIZATION_FACTOR",
        defaults.retry.randomization_factor,
    )?;

    let flows = &mut config.flows;
    flows.storage_connection_string = string_var(
        env,
        "FLOW_SA_CONNECTION_STRING",
        &defaults.flows.storage_connection_string,
    );
    flows.xml_blob = string_var(env, "FLOWS_XML_BLOB", &defaults.flows.xml_blob);
    flows.queue = string_var(env, "FLOWS_QUEUE", &defaults.flows.queue);
    flows.table = string_var(env, "FLOWS_TABLE", &defaults.flows.table);
    flows.max_retry_queuing =
        parse_var(env, "MAX_RETRY_QUEUING", defaults.flows.max_retry_queuing)?;
    flows.queue_retention_sec =
        parse_var(env, "QUEUE_RETENTION_SEC", defaults.flows.queue_retention_sec)?;
    flows.queue_delay_sec = parse_var(env, "QUEUE_DELAY_SEC", defaults.flows.queue_delay_sec)?;

    let obs = &mut config.observability;
    obs.log_level = string_var(env, "LOG_LEVEL", &defaults.observability.log_level);
    obs.log_json = bool_var(env, "LOG_JSON", defaults.observability.log_json);
    obs.metrics_enabled = bool_var(env, "METRICS_ENABLED", defaults.observability.metrics_enabled);
    obs.metrics_address = string_var(
        env,
        "METRICS_ADDRESS",
        &defaults.observability.metrics_address,
    );

    config.server.bind_address =
        string_var(env, "INFO_BIND_ADDRESS", &defaults.server.bind_address);
    config.server.worker_concurrency = parse_var(
        env,
        "WORKER_CONCURRENCY",
        defaults.server.worker_concurrency,
    )?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn string_var<E: ReadEnv>(env: &E, key: &str, default: &str) -> String {
    env.var(key).unwrap_or_else(|_| default.to_string())
}

// Anything other than a case-insensitive "true" reads as false.
fn bool_var<E: ReadEnv>(env: &E, key: &str, default: bool) -> bool {
    match env.var(key) {
        Ok(value) => value.trim().eq_ignore_ascii_case("true"),
        Err(_) => default,
    }
}

fn parse_var<E: ReadEnv, T: FromStr>(
    env: &E,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match env.var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::env::MapEnv;

    fn base_env() -> MapEnv {
        MapEnv::new().with("CACHE_CLIENT_HOST", "https://api.example.it")
    }

    #[test]
    fn test_env_defaults() {
        let config = from_env(&base_env()).unwrap();
        assert_eq!(
            config.api_config.url(),
            "https://api.example.it/cache?keys=creditorInstitutionStations,stations"
        );
        assert!(!config.retry.enabled);
        assert_eq!(config.retry.max_elapsed_time_millis, 1000);
        assert_eq!(config.flows.queue_delay_sec, 60);
    }

    #[test]
    fn test_env_overrides() {
        let env = base_env()
            .with("CACHE_API_KEY", "secret")
            .with("ENABLE_CLIENT_RETRY", "TRUE")
            .with("MULTIPLIER", "2.0")
            .with("MAX_RETRY_QUEUING", "60")
            .with("QUEUE_RETENTION_SEC", "60")
            .with("FLOWS_QUEUE", "flows");

        let config = from_env(&env).unwrap();
        assert_eq!(config.api_config.api_key, "secret");
        assert!(config.retry.enabled);
        assert_eq!(config.retry.multiplier, 2.0);
        assert_eq!(config.flows.max_retry_queuing, 60);
        assert_eq!(config.flows.queue_retention_sec, 60);
        assert_eq!(config.flows.queue, "flows");
    }

    #[test]
    fn test_env_bool_is_lenient() {
        let env = base_env().with("ENABLE_CLIENT_RETRY", "yes");
        assert!(!from_env(&env).unwrap().retry.enabled);
    }

    #[test]
    fn test_env_backoff_unchecked_without_retry() {
        let env = base_env().with("RANDOMIZATION_FACTOR", "1");
        assert!(from_env(&env).is_ok());

        let env = env.with("ENABLE_CLIENT_RETRY", "true");
        assert!(matches!(from_env(&env), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_env_invalid_number() {
        let env = base_env().with("MAX_RETRY_QUEUING", "many");
        match from_env(&env) {
            Err(ConfigError::InvalidValue { key, value }) => {
                assert_eq!(key, "MAX_RETRY_QUEUING");
                assert_eq!(value, "many");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_env_missing_host() {
        let err = from_env(&MapEnv::new()).unwrap_err();
        assert!(err.to_string().contains("api_config.host is not set"));
    }

    #[test]
    fn test_load_config_file() {
        let path = std::env::temp_dir().join(format!(
            "reporting_details_config_{}.toml",
            std::process::id()
        ));
        fs::write(
            &path,
            "[api_config]\nhost = \"https://api.example.it\"\n\n[flows]\nqueue = \"flows\"\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.flows.queue, "flows");

        fs::remove_file(&path).unwrap_or_default();
    }
}
