//! Multi-city aggregations.
//!
//! # Data Flow
//! ```text
//! city list (given, or from /v2018/cities)
//!     → fanout::FanOut::fetch_many(current(city))
//!     → per-city extraction from the raw payload
//!     → report with successes, per-city errors and counts
//! ```
//!
//! # Design Decisions
//! - Partial results are normal; a report carries its own error list
//! - Only a batch where every city failed is an error

pub mod compare;
pub mod forecast;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::upstream::FetchError;

pub use compare::{compare_cities, CityComparison, ComparisonReport};
pub use forecast::{forecasts, CityForecast, ForecastReport, Trend};

/// Errors from the aggregation layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Failed to fetch data for all {requested} cities. Errors: {summary}")]
    AllFailed { requested: usize, summary: String },
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// A city that could not be included in a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityError {
    pub city: String,
    pub error: String,
}

impl CityError {
    fn new(city: &str, error: impl ToString) -> Self {
        Self {
            city: city.to_string(),
            error: error.to_string(),
        }
    }
}

pub(crate) fn all_failed(requested: usize, errors: &[CityError]) -> ServiceError {
    let summary = errors
        .iter()
        .take(3)
        .map(|e| format!("{}: {}", e.city, e.error))
        .collect::<Vec<_>>()
        .join("; ");
    ServiceError::AllFailed { requested, summary }
}

/// The non-null `aare` object of a `/v2018/current` payload.
pub(crate) fn aare_section(payload: &Value) -> Option<&Value> {
    payload.get("aare").filter(|aare| aare.is_object())
}

/// City identifiers from a `/v2018/cities` payload (a bare array).
pub fn city_ids(payload: &Value) -> Vec<String> {
    payload
        .as_array()
        .map(|cities| {
            cities
                .iter()
                .filter_map(|c| c.get("city").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
