//! Upstream request types and error definitions.

use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// Query parameters for one upstream call. Ordered, so iteration is canonical.
pub type Params = BTreeMap<String, String>;

/// Errors that can occur while fetching from the upstream API.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Connection, DNS or protocol failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The call did not finish within its deadline.
    #[error("Upstream timeout after {0:?}")]
    Timeout(Duration),

    /// Upstream answered with a non-success status.
    #[error("HTTP {status} from {endpoint}")]
    Status { status: u16, endpoint: String },

    /// Body was not valid JSON.
    #[error("Invalid JSON response: {0}")]
    Decode(String),

    /// Base URL and endpoint do not form a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A fan-out child task panicked or was cancelled.
    #[error("Fetch task failed: {0}")]
    Panicked(String),
}

impl FetchError {
    /// Whether a later attempt could plausibly succeed.
    ///
    /// Informational only; nothing in this crate retries.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Transport(_) | FetchError::Timeout(_) => true,
            FetchError::Status { status, .. } => *status == 429 || *status >= 500,
            FetchError::Decode(_) | FetchError::InvalidUrl(_) | FetchError::Panicked(_) => false,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            FetchError::Status {
                status: status.as_u16(),
                endpoint: err
                    .url()
                    .map(|u| u.path().to_string())
                    .unwrap_or_default(),
            }
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, FetchError>;
