//! Upstream client subsystem.
//!
//! # Data Flow
//! ```text
//! caller
//!     → endpoints.rs (named endpoint → path, params, cache policy)
//!     → scoped.rs fetch_one
//!         → cache hit: return
//!         → miss: rate limiter wait_turn → Fetch → cache put → return
//! ```
//!
//! # Design Decisions
//! - One cache and one rate limiter per session, never process-wide
//! - Session state is shared by cloning the client into concurrent tasks
//! - Locks cover in-memory reads/updates only, never a sleep or a network call

pub mod endpoints;
pub mod scoped;

pub use endpoints::Endpoint;
pub use scoped::{ClientOptions, ScopedClient};
