//! Configuration loading from disk and from the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{BridgeConfig, NotifierConfig};
use crate::config::validation::{validate_config, ValidationError};

pub const ENV_PROJECT_ID: &str = "AB_PROJECT_ID";
pub const ENV_PROJECT_KEY: &str = "AB_PROJECT_KEY";
pub const ENV_ENVIRONMENT: &str = "AB_ENV";
pub const ENV_SOURCE_PATH: &str = "AB_SRCPATH";
pub const ENV_HOST: &str = "AB_HOST";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("environment variable {0:?} not set")]
    MissingEnv(&'static str),

    #[error("environment variable {name:?} is invalid: {reason}")]
    InvalidEnv { name: &'static str, reason: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<BridgeConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: BridgeConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load and validate configuration from `AB_*` environment variables.
pub fn load_from_env() -> Result<BridgeConfig, ConfigError> {
    load_from_lookup(|name| std::env::var(name).ok())
}

/// Load configuration through an arbitrary variable lookup.
///
/// Empty values count as unset.
pub fn load_from_lookup<F>(lookup: F) -> Result<BridgeConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|v| !v.is_empty());
    let require = |name: &'static str| get(name).ok_or(ConfigError::MissingEnv(name));

    let project_id = require(ENV_PROJECT_ID)?
        .trim()
        .parse::<i64>()
        .map_err(|e| ConfigError::InvalidEnv {
            name: ENV_PROJECT_ID,
            reason: e.to_string(),
        })?;
    let project_key = require(ENV_PROJECT_KEY)?;
    let environment = require(ENV_ENVIRONMENT)?;

    let mut notifier = NotifierConfig::new(project_id, project_key, environment);
    notifier.source_path_prefix = get(ENV_SOURCE_PATH);

    let mut config = BridgeConfig::new(notifier);
    if let Some(host) = get(ENV_HOST) {
        config.delivery.host = host;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
