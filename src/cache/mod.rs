//! Response cache subsystem.
//!
//! # Data Flow
//! ```text
//! (endpoint, params)
//!     → key.rs (canonical CacheKey, parameter order independent)
//!     → ttl.rs (lookup; expired entries evicted on read)
//!     → hit: payload returned, no upstream call
//!     → miss: caller fetches, then stores with the configured TTL
//! ```
//!
//! # Design Decisions
//! - No size cap; the entity set is a few dozen locations
//! - Failures are never cached

pub mod key;
pub mod ttl;

pub use key::CacheKey;
pub use ttl::{CacheEntry, TtlCache};
