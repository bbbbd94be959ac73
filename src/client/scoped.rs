//! Session-scoped upstream client.
//!
//! # Responsibilities
//! - Own the connection pool, cache and rate limiter for one session
//! - Answer single-entity requests: cache → rate limiter → fetch → cache
//! - Release the pool when the session ends, on every exit path

use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::cache::{CacheKey, TtlCache};
use crate::config::AppConfig;
use crate::resilience::IntervalRateLimiter;
use crate::upstream::{Fetch, HttpFetcher, Params, UpstreamResult};

/// Per-session client settings.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Lifetime of cached responses.
    pub cache_ttl: Duration,
    /// Minimum gap between upstream calls.
    pub min_interval: Duration,
    /// Sent as `app` on every call; `None` sends nothing.
    pub app_name: Option<String>,
    /// Sent as `version` on every call; `None` sends nothing.
    pub app_version: Option<String>,
}

impl ClientOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            cache_ttl: config.cache.ttl(),
            min_interval: config.rate_limit.min_interval(),
            app_name: Some(config.upstream.app_name.clone()),
            app_version: Some(config.upstream.app_version.clone()),
        }
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

struct Session<F: Fetch> {
    id: Uuid,
    fetcher: F,
    cache: TtlCache,
    limiter: IntervalRateLimiter,
    options: ClientOptions,
}

impl<F: Fetch> Drop for Session<F> {
    fn drop(&mut self) {
        tracing::debug!(session = %self.id, "Upstream session released");
    }
}

/// Client for one logical session.
///
/// Cloning is cheap and shares the cache, rate limiter and connection pool,
/// which is how concurrent fan-out tasks use one session. The pool is
/// released when the last clone is dropped or closed.
pub struct ScopedClient<F: Fetch = HttpFetcher> {
    session: Arc<Session<F>>,
}

impl ScopedClient<HttpFetcher> {
    /// Open a session against the configured upstream.
    pub fn open(config: &AppConfig) -> UpstreamResult<Self> {
        let fetcher = HttpFetcher::new(&config.upstream)?;
        Ok(Self::with_fetcher(fetcher, ClientOptions::from_config(config)))
    }
}

impl<F: Fetch> ScopedClient<F> {
    /// Open a session over any [`Fetch`] implementation.
    pub fn with_fetcher(fetcher: F, options: ClientOptions) -> Self {
        let session = Session {
            id: Uuid::new_v4(),
            fetcher,
            cache: TtlCache::new(),
            limiter: IntervalRateLimiter::new(options.min_interval),
            options,
        };
        tracing::debug!(
            session = %session.id,
            cache_ttl_secs = session.options.cache_ttl.as_secs(),
            min_interval_ms = session.options.min_interval.as_millis() as u64,
            "Upstream session opened"
        );
        Self {
            session: Arc::new(session),
        }
    }

    /// Fetch one payload, from cache when allowed and fresh.
    ///
    /// Errors from the fetcher are returned unchanged and never cached.
    pub async fn fetch_one(
        &self,
        endpoint: &str,
        mut params: Params,
        use_cache: bool,
    ) -> UpstreamResult<Value> {
        let session = &self.session;
        if let Some(app) = &session.options.app_name {
            params.insert("app".to_string(), app.clone());
        }
        if let Some(version) = &session.options.app_version {
            params.insert("version".to_string(), version.clone());
        }

        let key = CacheKey::new(endpoint, &params);
        if use_cache {
            if let Some(cached) = session.cache.get(&key) {
                return Ok(cached);
            }
        }

        session.limiter.wait_turn().await;
        tracing::debug!(session = %session.id, endpoint, cached = use_cache, "Fetching from upstream");

        let data = session.fetcher.fetch(endpoint, &params).await?;
        if use_cache {
            session.cache.put(key, data.clone(), session.options.cache_ttl);
        }
        Ok(data)
    }

    pub fn session_id(&self) -> Uuid {
        self.session.id
    }

    /// The session's response cache.
    pub fn cache(&self) -> &TtlCache {
        &self.session.cache
    }

    pub fn rate_limiter(&self) -> &IntervalRateLimiter {
        &self.session.limiter
    }

    pub fn options(&self) -> &ClientOptions {
        &self.session.options
    }

    /// End this handle's use of the session.
    ///
    /// Dropping has the same effect; this only adds a closing log line.
    pub fn close(self) {
        tracing::info!(
            session = %self.session.id,
            cache_entries = self.session.cache.len(),
            "Closing upstream session"
        );
    }
}

impl<F: Fetch> Clone for ScopedClient<F> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
        }
    }
}

impl<F: Fetch> std::fmt::Debug for ScopedClient<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedClient")
            .field("session", &self.session.id)
            .field("cache_entries", &self.session.cache.len())
            .field("options", &self.session.options)
            .finish()
    }
}
