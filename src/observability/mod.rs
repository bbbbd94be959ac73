//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! cache / rate limiter / client / fan-out produce:
//!     → tracing events (structured fields, `session` id on client events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → logging.rs subscriber (stderr, text or JSON)
//!     → whatever metrics recorder the embedding process installs
//! ```

pub mod logging;
pub mod metrics;
