//! Named upstream endpoints.

use serde_json::Value;
use std::fmt;

use crate::client::ScopedClient;
use crate::upstream::{Fetch, Params, UpstreamResult};

/// Endpoints of the upstream API used by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// All known cities with their latest readings.
    Cities,
    /// Minimal current reading for one city.
    Today,
    /// Full current conditions for one city (water, flow, weather).
    Current,
    /// Current data for all cities in one payload.
    Widget,
    /// Time series for one city over a range.
    History,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Cities => "/v2018/cities",
            Endpoint::Today => "/v2018/today",
            Endpoint::Current => "/v2018/current",
            Endpoint::Widget => "/v2018/widget",
            Endpoint::History => "/v2018/history",
        }
    }

    /// Range queries are effectively unique per call, so they bypass the cache.
    pub fn cacheable(&self) -> bool {
        !matches!(self, Endpoint::History)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

fn city_params(city: &str) -> Params {
    let mut params = Params::new();
    params.insert("city".to_string(), city.to_string());
    params
}

impl<F: Fetch> ScopedClient<F> {
    /// Fetch a named endpoint with its cache policy.
    pub async fn fetch_endpoint(&self, endpoint: Endpoint, params: Params) -> UpstreamResult<Value> {
        self.fetch_one(endpoint.path(), params, endpoint.cacheable())
            .await
    }

    pub async fn cities(&self) -> UpstreamResult<Value> {
        self.fetch_endpoint(Endpoint::Cities, Params::new()).await
    }

    pub async fn today(&self, city: &str) -> UpstreamResult<Value> {
        self.fetch_endpoint(Endpoint::Today, city_params(city)).await
    }

    pub async fn current(&self, city: &str) -> UpstreamResult<Value> {
        self.fetch_endpoint(Endpoint::Current, city_params(city)).await
    }

    pub async fn widget(&self) -> UpstreamResult<Value> {
        self.fetch_endpoint(Endpoint::Widget, Params::new()).await
    }

    /// Time series between `start` and `end` (ISO date, unix timestamp,
    /// or relative expressions such as `-7 days` / `now`). Never cached.
    pub async fn history(&self, city: &str, start: &str, end: &str) -> UpstreamResult<Value> {
        let mut params = city_params(city);
        params.insert("start".to_string(), start.to_string());
        params.insert("end".to_string(), end.to_string());
        self.fetch_endpoint(Endpoint::History, params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientOptions;
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingFetcher {
        seen: Mutex<Vec<(String, Params)>>,
    }

    impl Fetch for RecordingFetcher {
        async fn fetch(&self, endpoint: &str, params: &Params) -> UpstreamResult<Value> {
            self.seen
                .lock()
                .unwrap()
                .push((endpoint.to_string(), params.clone()));
            Ok(json!({ "ok": true }))
        }
    }

    fn client(fetcher: Arc<RecordingFetcher>) -> ScopedClient<Arc<RecordingFetcher>> {
        ScopedClient::with_fetcher(
            fetcher,
            ClientOptions {
                cache_ttl: Duration::from_secs(120),
                min_interval: Duration::ZERO,
                app_name: None,
                app_version: None,
            },
        )
    }

    #[test]
    fn test_paths_and_cache_policy() {
        assert_eq!(Endpoint::Today.path(), "/v2018/today");
        assert_eq!(Endpoint::Cities.to_string(), "/v2018/cities");
        assert!(Endpoint::Current.cacheable());
        assert!(Endpoint::Widget.cacheable());
        assert!(!Endpoint::History.cacheable());
    }

    #[tokio::test(start_paused = true)]
    async fn test_history_bypasses_cache() {
        let fetcher = Arc::new(RecordingFetcher::default());
        let client = client(Arc::clone(&fetcher));

        client.history("bern", "-7 days", "now").await.unwrap();
        client.history("bern", "-7 days", "now").await.unwrap();
        client.current("bern").await.unwrap();
        client.current("bern").await.unwrap();

        let seen = fetcher.seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0].0, "/v2018/history");
        assert_eq!(seen[0].1.get("start").map(String::as_str), Some("-7 days"));
        assert_eq!(seen[0].1.get("end").map(String::as_str), Some("now"));
        assert_eq!(seen[2].0, "/v2018/current");
        assert_eq!(client.cache().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_named_endpoints_are_cached() {
        let client = client(Arc::default());
        client.today("olten").await.unwrap();
        client.cities().await.unwrap();
        client.widget().await.unwrap();
        assert_eq!(client.cache().len(), 3);
    }
}
