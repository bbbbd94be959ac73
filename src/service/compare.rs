//! Side-by-side comparison of current conditions across cities.

use serde::Serialize;
use serde_json::Value;

use crate::client::ScopedClient;
use crate::fanout::{FanOut, FanOutSummary};
use crate::service::{aare_section, all_failed, city_ids, CityError, ServiceResult};
use crate::upstream::Fetch;

/// Flow (m³/s) below which a city counts as safe for swimming.
pub const SAFE_FLOW_M3S: f64 = 150.0;

/// Current readings for one city.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityComparison {
    pub city: String,
    pub temperature: Option<f64>,
    pub flow: Option<f64>,
    /// `flow < 150`; a city without a flow reading counts as safe.
    pub safe: bool,
    pub temperature_text: Option<String>,
    pub location: Option<String>,
}

impl CityComparison {
    fn from_aare(city: &str, aare: &Value) -> Self {
        let flow = aare.get("flow").and_then(Value::as_f64);
        Self {
            city: city.to_string(),
            temperature: aare.get("temperature").and_then(Value::as_f64),
            flow,
            safe: flow.map_or(true, |f| f < SAFE_FLOW_M3S),
            temperature_text: text_field(aare, "temperature_text"),
            location: text_field(aare, "location"),
        }
    }
}

fn text_field(value: &Value, name: &str) -> Option<String> {
    value.get(name).and_then(Value::as_str).map(str::to_string)
}

/// Cities ranked warmest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub cities: Vec<CityComparison>,
    pub warmest: Option<CityComparison>,
    pub coldest: Option<CityComparison>,
    pub safe_count: usize,
    /// Cities that returned usable data.
    pub total_count: usize,
    pub requested_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<CityError>,
}

/// Compare current conditions for `cities`, or for every known city when `None`.
///
/// Fails only when every requested city failed.
pub async fn compare_cities<F: Fetch>(
    client: &ScopedClient<F>,
    fan_out: &FanOut,
    cities: Option<Vec<String>>,
) -> ServiceResult<ComparisonReport> {
    let cities = match cities {
        Some(cities) => cities,
        None => city_ids(&client.cities().await?),
    };
    tracing::info!(count = cities.len(), ?cities, "Comparing cities");

    let session = client.clone();
    let results = fan_out
        .fetch_many(cities, move |city: String| {
            let session = session.clone();
            async move { session.current(&city).await }
        })
        .await;
    let requested_count = results.len();
    tracing::debug!(summary = %FanOutSummary::of(&results), "Comparison fetch settled");

    let mut ranked = Vec::new();
    let mut errors = Vec::new();
    for result in results {
        match result.outcome {
            Ok(payload) => match aare_section(&payload) {
                Some(aare) => ranked.push(CityComparison::from_aare(&result.key, aare)),
                None => errors.push(CityError::new(&result.key, "No aare data available")),
            },
            Err(e) => {
                tracing::warn!(city = %result.key, error = %e, "Failed to fetch city");
                errors.push(CityError::new(&result.key, e));
            }
        }
    }

    if ranked.is_empty() && requested_count > 0 {
        return Err(all_failed(requested_count, &errors));
    }

    ranked.sort_by(|a, b| {
        b.temperature
            .unwrap_or(0.0)
            .total_cmp(&a.temperature.unwrap_or(0.0))
    });

    tracing::info!(
        succeeded = ranked.len(),
        requested = requested_count,
        "Comparison complete"
    );

    Ok(ComparisonReport {
        warmest: ranked.first().cloned(),
        coldest: ranked.last().cloned(),
        safe_count: ranked.iter().filter(|c| c.safe).count(),
        total_count: ranked.len(),
        requested_count,
        cities: ranked,
        errors,
    })
}
