//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, concurrency bound > 0)
//! - Check the upstream base URL parses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::schema::AppConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Upper bound on `rate_limit.min_interval_ms` (one day).
pub const MAX_MIN_INTERVAL_MS: u64 = 24 * 60 * 60 * 1000;

/// A single semantic problem with a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("upstream.base_url '{0}' is not a valid http(s) URL")]
    InvalidBaseUrl(String),

    #[error("upstream.request_timeout_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("upstream.app_name must not be empty")]
    EmptyAppName,

    #[error("rate_limit.min_interval_ms {0} exceeds one day")]
    ExcessiveMinInterval(u64),

    #[error("fanout.max_concurrency must be greater than zero when set")]
    ZeroConcurrency,

    #[error("logging.level '{0}' is not one of trace, debug, info, warn, error")]
    UnknownLogLevel(String),
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.upstream.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => errors.push(ValidationError::InvalidBaseUrl(
            config.upstream.base_url.clone(),
        )),
    }

    if config.upstream.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if config.upstream.app_name.trim().is_empty() {
        errors.push(ValidationError::EmptyAppName);
    }

    if config.rate_limit.min_interval_ms > MAX_MIN_INTERVAL_MS {
        errors.push(ValidationError::ExcessiveMinInterval(
            config.rate_limit.min_interval_ms,
        ));
    }

    if config.fanout.max_concurrency == Some(0) {
        errors.push(ValidationError::ZeroConcurrency);
    }

    let level = config.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(config.logging.level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = AppConfig::default();
        config.upstream.base_url = "not a url".into();
        config.upstream.request_timeout_secs = 0;
        config.fanout.max_concurrency = Some(0);
        config.logging.level = "loud".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::ZeroRequestTimeout));
        assert!(errors.contains(&ValidationError::ZeroConcurrency));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let mut config = AppConfig::default();
        config.upstream.base_url = "ftp://example.com".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::InvalidBaseUrl("ftp://example.com".into())]);
    }

    #[test]
    fn test_interval_bounds() {
        let mut config = AppConfig::default();
        config.rate_limit.min_interval_ms = MAX_MIN_INTERVAL_MS;
        assert!(validate_config(&config).is_ok());

        config.rate_limit.min_interval_ms = u64::MAX;
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::ExcessiveMinInterval(u64::MAX)]
        );
    }

    #[test]
    fn test_huge_ttl_is_allowed() {
        let mut config = AppConfig::default();
        config.cache.ttl_secs = u64::MAX;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_zero_interval_is_allowed() {
        let mut config = AppConfig::default();
        config.rate_limit.min_interval_ms = 0;
        config.cache.ttl_secs = 0;
        assert!(validate_config(&config).is_ok());
    }
}
