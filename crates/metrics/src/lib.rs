//! Metrics definitions for handoff.
//!
//! Crates record through the `metrics` facade; the host binary decides which
//! recorder (Prometheus, statsd, none) receives them.
//!
//! ```rust,ignore
//! use handoff_metrics::{counter, routing};
//!
//! counter!(routing::REQUESTS_ACCEPTED_TOTAL).increment(1);
//! ```

mod definitions;

pub use definitions::*;

// Re-export metrics macros for convenience
pub use metrics::{counter, gauge, histogram};
