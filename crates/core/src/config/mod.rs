//! Service configuration.
//!
//! Configuration is loaded from a TOML file merged with `PRESSA_`-prefixed
//! environment variables. Every section has defaults, so a missing file is
//! not fatal to callers that opt into [`Config::default`].

mod loader;
mod types;
mod validate;

use thiserror::Error;

pub use loader::{load_config, load_config_from_str};
pub use types::{Config, ServerConfig};
pub use validate::validate_config;

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(String),

    #[error("failed to parse config: {0}")]
    ParseError(String),

    #[error("invalid configuration: {0}")]
    ValidationError(String),
}
