//! # chainrlp-core
//!
//! Core traits, types, and primitives shared across all ChainRLP crates.
//! Type descriptors, field modifiers, the wire stream and output buffer,
//! and the `StrategyBuilder` seam the type registry drives all live here.

pub mod buffer;
pub mod error;
pub mod modifiers;
pub mod strategy;
pub mod stream;
pub mod types;
pub mod value;

pub use buffer::{EncodeBuffer, ListMark};
pub use error::{CodecError, ResolveError, TailViolation};
pub use modifiers::{ModifierParser, ModifierSet};
pub use strategy::{
    DecodeStrategy, FieldDescriptor, MetadataHandle, NestedResolver, Strategies, StrategyBuilder,
    TypeKey, TypeMetadata, WriteStrategy,
};
pub use stream::{ItemKind, Stream};
pub use types::{
    CompositeType, FieldDecl, FieldType, OptionalType, Primitive, SequenceType, TypeDescriptor,
    TypeIdentity, TypeKind, TypeRef, Visibility,
};
pub use value::Value;
