//! reqwest-backed upstream fetcher.
//!
//! # Responsibilities
//! - Own the pooled HTTP transport for one client session
//! - Issue GET requests with query parameters
//! - Apply the per-call deadline and map failures to [`FetchError`]

use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::config::UpstreamConfig;
use crate::observability::metrics;
use crate::resilience::timeouts::with_timeout;
use crate::upstream::fetcher::Fetch;
use crate::upstream::types::{FetchError, Params, UpstreamResult};

/// HTTP fetcher with connection pooling.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: Url,
    timeout_duration: Duration,
}

impl HttpFetcher {
    /// Build the connection pool for `config.base_url`.
    pub fn new(config: &UpstreamConfig) -> UpstreamResult<Self> {
        let mut base_url = Url::parse(&config.base_url)
            .map_err(|e| FetchError::InvalidUrl(format!("'{}': {}", config.base_url, e)))?;
        // Endpoints are appended below any path prefix, so the base must be a directory.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .pool_max_idle_per_host(config.max_idle_per_host)
            .user_agent(format!("{}/{}", config.app_name, config.app_version))
            .build()
            .map_err(|e| FetchError::Transport(format!("failed to build HTTP client: {}", e)))?;

        tracing::debug!(
            base_url = %base_url,
            timeout_secs = config.request_timeout_secs,
            "HTTP fetcher initialized"
        );

        Ok(Self {
            client,
            base_url,
            timeout_duration: config.request_timeout(),
        })
    }

    fn endpoint_url(&self, endpoint: &str) -> UpstreamResult<Url> {
        self.base_url
            .join(endpoint.trim_start_matches('/'))
            .map_err(|e| FetchError::InvalidUrl(format!("'{}': {}", endpoint, e)))
    }

    async fn get(&self, url: Url, endpoint: &str, params: &Params) -> UpstreamResult<Value> {
        let response = self.client.get(url).query(params).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(endpoint, status = status.as_u16(), "Upstream returned error status");
            return Err(FetchError::Status {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| {
            tracing::error!(endpoint, error = %e, "Invalid JSON response");
            FetchError::Decode(e.to_string())
        })
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, endpoint: &str, params: &Params) -> UpstreamResult<Value> {
        let url = self.endpoint_url(endpoint)?;
        tracing::info!(url = %url, ?params, "GET");

        let result = with_timeout(self.timeout_duration, self.get(url, endpoint, params)).await;
        match &result {
            Ok(_) => metrics::record_upstream_request(endpoint, true),
            Err(e) => {
                tracing::warn!(endpoint, error = %e, transient = e.is_transient(), "Upstream request failed");
                metrics::record_upstream_request(endpoint, false);
            }
        }
        result
    }
}

impl std::fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout_duration)
            .finish()
    }
}
