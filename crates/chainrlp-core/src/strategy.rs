//! Strategies, cache keys, metadata records, and the builder seam.
//!
//! A [`TypeMetadata`] record starts life as a placeholder (no strategies)
//! and is completed exactly once. Handles to it are shared `Arc`s, so a
//! recursive type can hold a handle to itself before its own strategies
//! exist; invoking an incomplete handle fails with
//! [`CodecError::Unresolved`] instead of recursing.

use crate::buffer::EncodeBuffer;
use crate::error::{CodecError, ResolveError};
use crate::modifiers::ModifierSet;
use crate::stream::Stream;
use crate::types::{TypeIdentity, TypeRef};
use crate::value::Value;
use std::{
    fmt,
    sync::{Arc, OnceLock},
};

/// Decodes one value from the stream.
pub type DecodeStrategy = Arc<dyn Fn(&mut Stream<'_>) -> Result<Value, CodecError> + Send + Sync>;

/// Appends one value to the output buffer.
pub type WriteStrategy = Arc<dyn Fn(&Value, &mut EncodeBuffer) -> Result<(), CodecError> + Send + Sync>;

/// The decode/write pair produced for one type key.
#[derive(Clone)]
pub struct Strategies {
    pub decode: DecodeStrategy,
    pub write: WriteStrategy,
}

impl Strategies {
    pub fn new<D, W>(decode: D, write: W) -> Self
    where
        D: Fn(&mut Stream<'_>) -> Result<Value, CodecError> + Send + Sync + 'static,
        W: Fn(&Value, &mut EncodeBuffer) -> Result<(), CodecError> + Send + Sync + 'static,
    {
        Self {
            decode: Arc::new(decode),
            write: Arc::new(write),
        }
    }
}

impl fmt::Debug for Strategies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Strategies { .. }")
    }
}

/// Cache key: a type's identity plus the modifiers it was requested with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeKey {
    pub ty: TypeIdentity,
    pub modifiers: ModifierSet,
}

impl TypeKey {
    pub fn new(ty: &TypeRef, modifiers: ModifierSet) -> Self {
        Self {
            ty: ty.identity(),
            modifiers,
        }
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.is_empty() {
            write!(f, "{}", self.ty)
        } else {
            write!(f, "{} `{}`", self.ty, self.modifiers)
        }
    }
}

/// Resolved metadata for one [`TypeKey`].
pub struct TypeMetadata {
    key: TypeKey,
    strategies: OnceLock<Strategies>,
}

/// Stable, shareable handle returned by the registry.
pub type MetadataHandle = Arc<TypeMetadata>;

impl TypeMetadata {
    /// A record without strategies yet.
    pub fn placeholder(key: TypeKey) -> MetadataHandle {
        Arc::new(Self {
            key,
            strategies: OnceLock::new(),
        })
    }

    /// Fill in the strategies. Returns `false` if they were already set,
    /// in which case the existing ones are kept.
    pub fn complete(&self, strategies: Strategies) -> bool {
        self.strategies.set(strategies).is_ok()
    }

    pub fn key(&self) -> &TypeKey {
        &self.key
    }

    pub fn is_resolved(&self) -> bool {
        self.strategies.get().is_some()
    }

    fn strategies(&self) -> Result<&Strategies, CodecError> {
        self.strategies.get().ok_or_else(|| CodecError::Unresolved {
            ty: self.key.to_string(),
        })
    }

    pub fn decode(&self, stream: &mut Stream<'_>) -> Result<Value, CodecError> {
        (self.strategies()?.decode)(stream)
    }

    pub fn write(&self, value: &Value, buf: &mut EncodeBuffer) -> Result<(), CodecError> {
        (self.strategies()?.write)(value, buf)
    }

    /// Decode a complete input holding exactly one value.
    pub fn decode_bytes(&self, input: &[u8]) -> Result<Value, CodecError> {
        let mut stream = Stream::new(input);
        let value = self.decode(&mut stream)?;
        stream.finish()?;
        Ok(value)
    }

    pub fn encode_to_vec(&self, value: &Value) -> Result<Vec<u8>, CodecError> {
        let mut buf = EncodeBuffer::new();
        self.write(value, &mut buf)?;
        Ok(buf.as_slice().to_vec())
    }
}

impl fmt::Debug for TypeMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeMetadata")
            .field("key", &self.key)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

/// A visible, non-ignored field of a composite with its resolved metadata.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Position among all declared fields of the owner
    pub index: usize,
    pub name: String,
    pub metadata: MetadataHandle,
}

/// Re-entrant view of the registry handed to a [`StrategyBuilder`] while
/// it builds. Calls through it never take the registry lock again.
pub trait NestedResolver {
    /// Resolve the metadata of a nested type.
    fn resolve(&mut self, ty: &TypeRef, modifiers: ModifierSet) -> Result<MetadataHandle, ResolveError>;

    /// Enumerate the codec fields of a composite type.
    fn fields(&mut self, ty: &TypeRef) -> Result<Vec<FieldDescriptor>, ResolveError>;
}

/// Derives strategies for a type.
///
/// # Thread Safety
/// Builders are shared by the registry across threads.
pub trait StrategyBuilder: Send + Sync {
    fn build(
        &self,
        ty: &TypeRef,
        modifiers: ModifierSet,
        resolver: &mut dyn NestedResolver,
    ) -> Result<Strategies, ResolveError>;
}
