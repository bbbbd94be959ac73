//! Metrics collection.
//!
//! # Metrics
//! - `aare_cache_hits_total` (counter): lookups answered from the cache
//! - `aare_cache_misses_total` (counter): lookups that were absent or expired
//! - `aare_upstream_requests_total` (counter): upstream calls by endpoint, outcome
//! - `aare_rate_limit_wait_seconds` (histogram): time spent waiting for a slot
//! - `aare_fanout_results_total` (counter): per-entity fan-out outcomes
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; no-ops until the embedding
//!   process installs a recorder
//! - Labels kept low-cardinality (endpoint path, outcome)

use std::time::Duration;

pub fn record_cache_hit() {
    metrics::counter!("aare_cache_hits_total").increment(1);
}

pub fn record_cache_miss() {
    metrics::counter!("aare_cache_misses_total").increment(1);
}

pub fn record_upstream_request(endpoint: &str, success: bool) {
    let outcome = if success { "success" } else { "error" };
    metrics::counter!(
        "aare_upstream_requests_total",
        "endpoint" => endpoint.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_rate_limit_wait(wait: Duration) {
    metrics::histogram!("aare_rate_limit_wait_seconds").record(wait.as_secs_f64());
}

pub fn record_fanout_result(success: bool) {
    let outcome = if success { "success" } else { "error" };
    metrics::counter!("aare_fanout_results_total", "outcome" => outcome).increment(1);
}
