//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: '{value}'")]
    Env { key: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from a TOML file, apply `AARE_*` environment
/// overrides, then validate the result.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    finish(config)
}

/// Defaults plus environment overrides, for running without a config file.
pub fn load_from_env() -> Result<AppConfig, ConfigError> {
    finish(AppConfig::default())
}

fn finish(mut config: AppConfig) -> Result<AppConfig, ConfigError> {
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Overlay environment values onto a parsed config.
///
/// `lookup` is injected so tests do not have to mutate the process environment.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("AARE_BASE_URL") {
        config.upstream.base_url = url;
    }
    if let Some(value) = lookup("AARE_CACHE_TTL_SECS") {
        config.cache.ttl_secs = parse_u64("AARE_CACHE_TTL_SECS", value)?;
    }
    if let Some(value) = lookup("AARE_MIN_INTERVAL_MS") {
        config.rate_limit.min_interval_ms = parse_u64("AARE_MIN_INTERVAL_MS", value)?;
    }
    if let Some(level) = lookup("AARE_LOG_LEVEL") {
        config.logging.level = level.to_ascii_lowercase();
    }
    Ok(())
}

fn parse_u64(key: &'static str, value: String) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Env { key, value })
}
