//! Upstream API access.
//!
//! # Data Flow
//! ```text
//! ScopedClient::fetch_one(endpoint, params)
//!     → fetcher.rs (Fetch trait: the only network boundary)
//!     → http.rs (reqwest GET, per-call deadline, JSON decode)
//!     → serde_json::Value or FetchError
//! ```
//!
//! # Design Decisions
//! - Payloads stay opaque `Value`s; typed mapping belongs to callers
//! - Errors carry a transient/permanent distinction but are never retried here

pub mod fetcher;
pub mod http;
pub mod types;

pub use fetcher::Fetch;
pub use http::HttpFetcher;
pub use types::{FetchError, Params, UpstreamResult};
