//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! environment (CACHE_CLIENT_HOST, ...) or config file (TOML)
//!     → loader.rs (lookup / parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → shared by value with the client, handler and worker
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod env;
pub mod loader;
pub mod schema;
pub mod validation;

pub use env::{MapEnv, ReadEnv, SystemEnv};
pub use loader::{from_env, load_config, ConfigError};
pub use schema::{
    ApiConfigSettings, FlowsConfig, ObservabilityConfig, RetryConfig, ServerConfig,
    ServiceConfig,
};
