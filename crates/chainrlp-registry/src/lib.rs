//! # chainrlp-registry
//!
//! Type-metadata cache for ChainRLP.
//!
//! Given a type descriptor and a modifier set, the [`TypeRegistry`] returns
//! the decode/write strategies for it, building them through a
//! [`StrategyBuilder`](chainrlp_core::StrategyBuilder) at most once per
//! distinct key for the registry's lifetime. Self-referential and mutually
//! recursive type graphs resolve through a placeholder recursion guard.

pub mod config;
pub mod fields;
pub mod registry;
pub mod stats;

pub use config::RegistryConfig;
pub use fields::FieldEnumerator;
pub use registry::TypeRegistry;
pub use stats::{RegistryStats, StatsSnapshot};
