//! Cache key canonicalisation.

use std::fmt;
use url::form_urlencoded;

use crate::upstream::Params;

/// Identity of one logical upstream request.
///
/// Rendered as `endpoint?k1=v1&k2=v2` with parameters in key order and
/// form-encoded, so insertion order never matters and a `&` or `=` inside a
/// value cannot make two different parameter sets collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(endpoint: &str, params: &Params) -> Self {
        let mut query = form_urlencoded::Serializer::new(String::new());
        for (name, value) in params {
            query.append_pair(name, value);
        }
        Self(format!("{}?{}", endpoint, query.finish()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
