//! # chainrlp-observability
//!
//! OpenTelemetry metrics and structured logging for ChainRLP.
//!
//! ## Built-in metrics
//! - `chainrlp.cache_hits`       — counter, lookups served by the fast path
//! - `chainrlp.cache_misses`     — counter, lookups that took the write lock
//! - `chainrlp.builds`           — counter, strategy builds
//! - `chainrlp.build_failures`   — counter, builds rolled back
//! - `chainrlp.placeholder_hits` — counter, recursive references
//!
//! ## Structured logging
//! JSON-structured or human-readable logs, levels configurable per crate.

pub mod metrics;
pub mod tracing_setup;

pub use metrics::RegistryMetrics;
pub use tracing_setup::{init_tracing, LogConfig};
