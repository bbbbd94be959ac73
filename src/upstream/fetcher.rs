//! The raw request collaborator.

use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

use crate::upstream::types::{Params, UpstreamResult};

/// Performs one upstream network call and decodes the JSON body.
///
/// Implementations own their timeout and connection handling. Callers in
/// this crate never retry; they only cache successes and space out calls.
pub trait Fetch: Send + Sync + 'static {
    fn fetch(
        &self,
        endpoint: &str,
        params: &Params,
    ) -> impl Future<Output = UpstreamResult<Value>> + Send;
}

impl<T: Fetch> Fetch for Arc<T> {
    fn fetch(
        &self,
        endpoint: &str,
        params: &Params,
    ) -> impl Future<Output = UpstreamResult<Value>> + Send {
        (**self).fetch(endpoint, params)
    }
}
