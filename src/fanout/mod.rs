//! Concurrent multi-entity fetch.
//!
//! # Data Flow
//! ```text
//! fetch_many([k1, k2, ... kn], fetch_one)
//!     → one spawned task per key (optionally gated by a semaphore)
//!         → fetch_one(k) → Ok(value) | Err(FetchError)
//!         → a panic becomes FetchError::Panicked for that key only
//!     → wait for all tasks
//!     → Vec<FetchResult> in input order
//! ```
//!
//! # Design Decisions
//! - A child failure never cancels or fails siblings or the batch
//! - Dropping the batch future aborts every child still running
//! - No retry state: pending → succeeded | failed
//! - Unbounded by default; the entity set is tens, not thousands

use futures_util::future::join_all;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::AbortHandle;

use crate::config::FanOutConfig;
use crate::observability::metrics;
use crate::upstream::FetchError;

/// Outcome of fetching one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResult<K, V = Value> {
    pub key: K,
    pub outcome: Result<V, FetchError>,
}

impl<K, V> FetchResult<K, V> {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn value(&self) -> Option<&V> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.outcome.as_ref().err()
    }
}

/// Success/failure counts over a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanOutSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl FanOutSummary {
    pub fn of<K, V>(results: &[FetchResult<K, V>]) -> Self {
        let succeeded = results.iter().filter(|r| r.is_ok()).count();
        Self {
            succeeded,
            failed: results.len() - succeeded,
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn all_failed(&self) -> bool {
        self.succeeded == 0 && self.failed > 0
    }
}

impl std::fmt::Display for FanOutSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} of {} returned data", self.succeeded, self.total())
    }
}

/// Aborts the spawned children when the batch is dropped before completion.
///
/// Aborting a finished task is a no-op, so this is harmless once every
/// child has been joined.
struct AbortOnDrop(Vec<AbortHandle>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        for handle in &self.0 {
            handle.abort();
        }
    }
}

/// Fan-out executor with an optional concurrency bound.
#[derive(Debug, Clone, Default)]
pub struct FanOut {
    max_concurrency: Option<usize>,
}

impl FanOut {
    /// Unbounded fan-out.
    pub fn new() -> Self {
        Self::default()
    }

    /// At most `limit` fetches in flight. A limit of zero is treated as one.
    pub fn bounded(limit: usize) -> Self {
        Self {
            max_concurrency: Some(limit.max(1)),
        }
    }

    pub fn from_config(config: &FanOutConfig) -> Self {
        match config.max_concurrency {
            Some(limit) => Self::bounded(limit),
            None => Self::new(),
        }
    }

    /// Run `fetch_one` for every key concurrently and collect every outcome.
    ///
    /// Never fails as a whole: each key gets its own result, in input order.
    pub async fn fetch_many<K, V, F, Fut>(&self, keys: Vec<K>, fetch_one: F) -> Vec<FetchResult<K, V>>
    where
        K: Clone + Send + 'static,
        V: Send + 'static,
        F: Fn(K) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V, FetchError>> + Send + 'static,
    {
        let fetch_one = Arc::new(fetch_one);
        let semaphore = self.max_concurrency.map(|n| Arc::new(Semaphore::new(n)));

        let handles: Vec<_> = keys
            .iter()
            .cloned()
            .map(|key| {
                let fetch_one = Arc::clone(&fetch_one);
                let semaphore = semaphore.clone();
                tokio::spawn(async move {
                    // The semaphore is never closed, so acquire only fails if it were.
                    let _permit = match semaphore {
                        Some(s) => s.acquire_owned().await.ok(),
                        None => None,
                    };
                    fetch_one(key).await
                })
            })
            .collect();

        let _children = AbortOnDrop(handles.iter().map(|h| h.abort_handle()).collect());
        let outcomes = join_all(handles).await;

        let results: Vec<_> = keys
            .into_iter()
            .zip(outcomes)
            .map(|(key, joined)| {
                let outcome = joined.unwrap_or_else(|e| {
                    tracing::error!(error = %e, "Fetch task did not complete");
                    Err(FetchError::Panicked(e.to_string()))
                });
                metrics::record_fanout_result(outcome.is_ok());
                FetchResult { key, outcome }
            })
            .collect();

        let summary = FanOutSummary::of(&results);
        tracing::info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Fan-out complete"
        );
        results
    }
}

/// Unbounded [`FanOut::fetch_many`].
pub async fn fetch_many<K, V, F, Fut>(keys: Vec<K>, fetch_one: F) -> Vec<FetchResult<K, V>>
where
    K: Clone + Send + 'static,
    V: Send + 'static,
    F: Fn(K) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<V, FetchError>> + Send + 'static,
{
    FanOut::new().fetch_many(keys, fetch_one).await
}
