//! # chainrlp-rlp
//!
//! RLP strategy builder for ChainRLP.
//!
//! [`RlpStrategyBuilder`] derives decode/write strategies for every
//! [`TypeKind`](chainrlp_core::TypeKind). Plug it into a
//! `chainrlp_registry::TypeRegistry` so that each strategy is derived once:
//!
//! ```ignore
//! let registry = TypeRegistry::new(Arc::new(RlpStrategyBuilder));
//! let meta = registry.resolve(&header_type(), ModifierSet::NONE)?;
//! let value = meta.decode_bytes(&raw)?;
//! ```

pub mod builder;
pub mod containers;
pub mod primitives;

pub use builder::RlpStrategyBuilder;
