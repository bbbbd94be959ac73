//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Cache miss in ScopedClient:
//!     → rate_limit.rs (reserve next slot, sleep outside the lock)
//!     → upstream fetch
//!         → timeouts.rs (deadline on the whole call)
//! ```
//!
//! # Design Decisions
//! - Every external call has a deadline
//! - No retries; transient failures surface to the caller
//! - Waiting never holds a lock

pub mod rate_limit;
pub mod timeouts;

pub use rate_limit::IntervalRateLimiter;
