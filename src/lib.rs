//! Data-access layer for the Aare river conditions API.
//!
//! Session-scoped HTTP client with a TTL response cache, a minimum-interval
//! rate limiter and concurrent multi-city fetch.

pub mod cache;
pub mod client;
pub mod config;
pub mod fanout;
pub mod observability;
pub mod resilience;
pub mod service;
pub mod upstream;

pub use client::{ClientOptions, Endpoint, ScopedClient};
pub use config::schema::AppConfig;
pub use fanout::{FanOut, FetchResult};
pub use upstream::{Fetch, FetchError, HttpFetcher, Params};
