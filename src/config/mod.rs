//! Configuration loading
//!
//! Credentials come from a line-oriented env file (falling back to the
//! process environment); run settings come from an optional YAML file.
//!
//! ## Env File Format
//!
//! ```text
//! # comment lines and blank lines are ignored
//! USER_KEY=my-key
//! USER_SEED=my-seed
//! ```
//!
//! ## Settings Format
//!
//! ```yaml
//! timeout: 5s
//! max_concurrency: 9
//! named_graph_sentinel: NANANA
//! probes:
//!   describe_get:
//!     enabled: false
//!   construct_get:
//!     timeout: 10s
//! ```

mod credentials;
mod env;
mod settings;

pub use credentials::{Credentials, USER_KEY, USER_SEED};
pub use env::{EnvFile, DEFAULT_ENV_FILE};
pub use settings::{ProbeConfig, Settings, DEFAULT_NAMED_GRAPH_SENTINEL, DEFAULT_TIMEOUT};

use thiserror::Error;

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse env file: {0}")]
    EnvFile(#[from] dotenvy::Error),

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Missing required credential {0}")]
    MissingCredential(&'static str),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
