//! Freshness-bounded response cache.

use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::cache::CacheKey;
use crate::observability::metrics;

/// A cached payload and the instant it stops being usable.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub data: V,
    /// `None` when the TTL reaches past what the clock can represent.
    pub expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    fn new(data: V, ttl: Duration) -> Self {
        Self {
            data,
            expires_at: Instant::now().checked_add(ttl),
        }
    }

    /// Usable iff `now < expires_at`.
    pub fn is_fresh(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| now < at)
    }
}

/// A thread-safe TTL cache.
///
/// Entries leave only when a lookup finds them expired (or through the
/// explicit `purge_expired`/`clear`); nothing sweeps in the background.
/// Shard locks are held for the map operation only.
#[derive(Debug, Clone)]
pub struct TtlCache<V = Value> {
    inner: Arc<DashMap<CacheKey, CacheEntry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
        }
    }

    /// Fresh data for `key`, if any. An expired entry is removed.
    pub fn get(&self, key: &CacheKey) -> Option<V> {
        let now = Instant::now();
        if let Some(entry) = self.inner.get(key) {
            if entry.is_fresh(now) {
                tracing::debug!(key = %key, "Cache hit");
                metrics::record_cache_hit();
                return Some(entry.data.clone());
            }
        } else {
            metrics::record_cache_miss();
            return None;
        }

        // The read guard is gone; only evict if nobody refreshed it meanwhile.
        if self.inner.remove_if(key, |_, entry| !entry.is_fresh(now)).is_some() {
            tracing::debug!(key = %key, "Cache expired");
        }
        metrics::record_cache_miss();
        None
    }

    /// Store `data`, replacing any entry for `key`, expiring `ttl` from now.
    pub fn put(&self, key: CacheKey, data: V, ttl: Duration) {
        tracing::debug!(key = %key, ttl_secs = ttl.as_secs(), "Cache set");
        self.inner.insert(key, CacheEntry::new(data, ttl));
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.inner.len();
        self.inner.retain(|_, entry| entry.is_fresh(now));
        before.saturating_sub(self.inner.len())
    }

    pub fn clear(&self) {
        self.inner.clear();
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
