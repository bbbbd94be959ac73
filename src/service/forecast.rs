//! Two-hour water temperature trend per city.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::client::ScopedClient;
use crate::fanout::FanOut;
use crate::service::{aare_section, all_failed, CityError, ServiceResult};
use crate::upstream::Fetch;

/// Direction of the forecast relative to the current reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Rising,
    Falling,
    Stable,
    Unknown,
}

impl Trend {
    pub fn between(current: Option<f64>, forecast: Option<f64>) -> Self {
        match (current, forecast) {
            (Some(now), Some(later)) if later > now => Trend::Rising,
            (Some(now), Some(later)) if later < now => Trend::Falling,
            (Some(_), Some(_)) => Trend::Stable,
            _ => Trend::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityForecast {
    pub current: Option<f64>,
    pub forecast_2h: Option<f64>,
    pub trend: Trend,
    /// `forecast_2h - current` when both are known.
    pub change: Option<f64>,
}

impl CityForecast {
    fn from_aare(aare: &Value) -> Self {
        let current = aare.get("temperature").and_then(Value::as_f64);
        let forecast_2h = aare.get("forecast2h").and_then(Value::as_f64);
        Self {
            current,
            forecast_2h,
            trend: Trend::between(current, forecast_2h),
            change: current.zip(forecast_2h).map(|(now, later)| later - now),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastReport {
    pub forecasts: BTreeMap<String, CityForecast>,
    pub success_count: usize,
    pub requested_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<CityError>,
}

/// Current temperature, 2h forecast and trend for each city.
///
/// Fails only when every requested city failed.
pub async fn forecasts<F: Fetch>(
    client: &ScopedClient<F>,
    fan_out: &FanOut,
    cities: Vec<String>,
) -> ServiceResult<ForecastReport> {
    tracing::info!(count = cities.len(), ?cities, "Fetching forecasts");

    let session = client.clone();
    let results = fan_out
        .fetch_many(cities, move |city: String| {
            let session = session.clone();
            async move { session.current(&city).await }
        })
        .await;
    let requested_count = results.len();

    let mut forecasts = BTreeMap::new();
    let mut errors = Vec::new();
    for result in results {
        match result.outcome {
            Ok(payload) => match aare_section(&payload) {
                Some(aare) => {
                    forecasts.insert(result.key, CityForecast::from_aare(aare));
                }
                None => {
                    tracing::warn!(city = %result.key, "No aare data");
                    errors.push(CityError::new(&result.key, "No aare data available"));
                }
            },
            Err(e) => {
                tracing::warn!(city = %result.key, error = %e, "Failed to fetch forecast");
                errors.push(CityError::new(&result.key, e));
            }
        }
    }

    if forecasts.is_empty() && requested_count > 0 {
        return Err(all_failed(requested_count, &errors));
    }

    tracing::info!(
        succeeded = forecasts.len(),
        requested = requested_count,
        "Forecast fetch complete"
    );

    Ok(ForecastReport {
        success_count: forecasts.len(),
        requested_count,
        forecasts,
        errors,
    })
}
