//! Minimum-interval rate limiter for upstream calls.
//!
//! # Algorithm
//! ```text
//! lock
//!     slot = max(now, last_request_at + min_interval)
//!     last_request_at = slot            (reserve)
//! unlock
//! sleep_until(slot)                     (no lock held)
//! ```
//!
//! Reserving under the lock means two callers never get the same slot.
//! Sleeping after the unlock means one caller's wait never delays another
//! caller's reservation, cache lookup or result handling.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::time::{sleep_until, Instant};

use crate::observability::metrics;

/// Enforces a minimum wall-clock gap between upstream calls.
///
/// One instance per client session; cache hits never touch it.
#[derive(Debug)]
pub struct IntervalRateLimiter {
    min_interval: Duration,
    /// Instant of the most recently issued (or reserved) upstream call.
    last_request_at: Mutex<Option<Instant>>,
}

impl IntervalRateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request_at: Mutex::new(None),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait until the next upstream call is permitted and record it.
    ///
    /// Returns how long this caller waited.
    pub async fn wait_turn(&self) -> Duration {
        let (slot, wait) = self.reserve();
        if !wait.is_zero() {
            tracing::debug!(wait_ms = wait.as_millis() as u64, "Rate limiting: waiting");
            metrics::record_rate_limit_wait(wait);
            sleep_until(slot).await;
        }
        wait
    }

    /// Claim the next free slot. The lock is held for this computation only.
    fn reserve(&self) -> (Instant, Duration) {
        let now = Instant::now();
        let mut last = self
            .last_request_at
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let slot = match *last {
            Some(prev) => (prev + self.min_interval).max(now),
            None => now,
        };
        *last = Some(slot);
        (slot, slot.saturating_duration_since(now))
    }

    /// Instant of the latest issued or reserved call, if any.
    pub fn last_request_at(&self) -> Option<Instant> {
        *self
            .last_request_at
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
