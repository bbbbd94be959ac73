//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the fetch layer.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the data-access layer.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Upstream API location and HTTP transport settings.
    pub upstream: UpstreamConfig,

    /// Response cache settings.
    pub cache: CacheConfig,

    /// Minimum spacing between upstream calls.
    pub rate_limit: RateLimitConfig,

    /// Multi-entity fetch settings.
    pub fanout: FanOutConfig,

    /// Log output settings.
    pub logging: LoggingConfig,
}

/// Upstream API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL (e.g., "https://aareguru.existenz.ch").
    pub base_url: String,

    /// Sent as the `app` query parameter on every call.
    pub app_name: String,

    /// Sent as the `version` query parameter on every call.
    pub app_version: String,

    /// Total time allowed for one upstream call, in seconds.
    pub request_timeout_secs: u64,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Idle keep-alive connections retained per host.
    pub max_idle_per_host: usize,
}

impl UpstreamConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://aareguru.existenz.ch".to_string(),
            app_name: "aare-fetch".to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            request_timeout_secs: 10,
            connect_timeout_secs: 5,
            max_idle_per_host: 10,
        }
    }
}

/// Cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Entry lifetime in seconds (upstream recommends 2 minutes).
    pub ttl_secs: u64,
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_secs: 120 }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Minimum gap between two upstream calls in milliseconds.
    /// `0` lets bursts through without waiting.
    pub min_interval_ms: u64,
}

impl RateLimitConfig {
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            // Upstream asks clients to poll no more than every 5 minutes.
            min_interval_ms: 300_000,
        }
    }
}

/// Fan-out configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FanOutConfig {
    /// Maximum in-flight entity fetches. `None` means unbounded.
    pub max_concurrency: Option<usize>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,

    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}
