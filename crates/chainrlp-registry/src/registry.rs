//! The type-metadata cache.
//!
//! Lookups take the read lock and return immediately on a hit. A miss
//! upgrades to the write lock and holds it for the whole build, including
//! every nested type the builder resolves along the way. Nested lookups go
//! through a [`BuildSession`] that already owns the write guard, so the
//! registry never re-locks itself.
//!
//! Before building a key the session inserts a placeholder for it. A type
//! that reaches itself again during its own build gets that placeholder
//! back instead of recursing; the placeholder is completed in place once
//! the outer build finishes.

use crate::config::RegistryConfig;
use crate::fields::FieldEnumerator;
use crate::stats::{RegistryStats, StatsSnapshot};
use chainrlp_core::{
    FieldDescriptor, MetadataHandle, ModifierSet, NestedResolver, ResolveError, StrategyBuilder,
    TypeKey, TypeMetadata, TypeRef,
};
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};
use tracing::{debug, trace, warn};

type Cache = HashMap<TypeKey, MetadataHandle>;

/// Thread-safe, append-only cache of resolved type metadata.
///
/// Create one at startup and share it by reference (or `Arc`). Entries are
/// never evicted; only a failed build removes what it inserted.
pub struct TypeRegistry {
    cache: RwLock<Cache>,
    builder: Arc<dyn StrategyBuilder>,
    config: RegistryConfig,
    stats: RegistryStats,
}

impl TypeRegistry {
    pub fn new(builder: Arc<dyn StrategyBuilder>) -> Self {
        Self::with_config(builder, RegistryConfig::default())
    }

    pub fn with_config(builder: Arc<dyn StrategyBuilder>, config: RegistryConfig) -> Self {
        Self {
            cache: RwLock::new(HashMap::with_capacity(config.initial_capacity)),
            builder,
            config,
            stats: RegistryStats::default(),
        }
    }

    /// Metadata for `ty` under `modifiers`, building it on first use.
    ///
    /// A successful result is always fully populated, including every
    /// handle reachable from its strategies.
    pub fn resolve(
        &self,
        ty: &TypeRef,
        modifiers: ModifierSet,
    ) -> Result<MetadataHandle, ResolveError> {
        let key = TypeKey::new(ty, modifiers);
        {
            let cache = self.cache.read().map_err(|_| ResolveError::LockPoisoned)?;
            if let Some(meta) = cache.get(&key) {
                self.stats.record_hit();
                return Ok(Arc::clone(meta));
            }
        }

        self.stats.record_miss();
        let mut cache = self.cache.write().map_err(|_| ResolveError::LockPoisoned)?;
        if let Some(meta) = cache.get(&key) {
            // another caller finished it while we waited for the lock
            return Ok(Arc::clone(meta));
        }
        let mut session = BuildSession {
            registry: self,
            cache: &mut *cache,
            inserted: Vec::new(),
            depth: 0,
        };
        session.resolve_key(ty, key)
    }

    /// Codec fields of a composite type, resolving each field's metadata.
    ///
    /// When every field type is cached this only takes the read lock.
    pub fn fields(&self, ty: &TypeRef) -> Result<Vec<FieldDescriptor>, ResolveError> {
        {
            let cache = self.cache.read().map_err(|_| ResolveError::LockPoisoned)?;
            let mut lookup = CachedLookup {
                cache: &*cache,
                missed: false,
            };
            let fields = FieldEnumerator::enumerate(ty, &mut lookup);
            if !lookup.missed {
                self.stats.record_hit();
                return fields;
            }
        }

        self.stats.record_miss();
        let mut cache = self.cache.write().map_err(|_| ResolveError::LockPoisoned)?;
        let mut session = BuildSession {
            registry: self,
            cache: &mut *cache,
            inserted: Vec::new(),
            depth: 0,
        };
        FieldEnumerator::enumerate(ty, &mut session)
    }

    /// Whether `ty` under `modifiers` is cached.
    pub fn contains(&self, ty: &TypeRef, modifiers: ModifierSet) -> bool {
        self.cache
            .read()
            .map(|cache| cache.contains_key(&TypeKey::new(ty, modifiers)))
            .unwrap_or(false)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.cache.read().map(|cache| cache.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}

/// Read-locked resolver that only answers from the cache.
struct CachedLookup<'r> {
    cache: &'r Cache,
    /// Set once a lookup finds no entry
    missed: bool,
}

impl NestedResolver for CachedLookup<'_> {
    fn resolve(
        &mut self,
        ty: &TypeRef,
        modifiers: ModifierSet,
    ) -> Result<MetadataHandle, ResolveError> {
        let key = TypeKey::new(ty, modifiers);
        match self.cache.get(&key) {
            Some(meta) => Ok(Arc::clone(meta)),
            None => {
                self.missed = true;
                Err(ResolveError::build(key, "not cached"))
            }
        }
    }

    fn fields(&mut self, ty: &TypeRef) -> Result<Vec<FieldDescriptor>, ResolveError> {
        FieldEnumerator::enumerate(ty, self)
    }
}

/// One write-locked resolution pass.
struct BuildSession<'r> {
    registry: &'r TypeRegistry,
    cache: &'r mut Cache,
    /// Keys inserted by this pass, in insertion order
    inserted: Vec<TypeKey>,
    depth: usize,
}

impl BuildSession<'_> {
    fn resolve_key(&mut self, ty: &TypeRef, key: TypeKey) -> Result<MetadataHandle, ResolveError> {
        if let Some(meta) = self.cache.get(&key) {
            if !meta.is_resolved() {
                trace!("recursive reference to {key}, returning placeholder");
                self.registry.stats.record_placeholder_hit();
            }
            return Ok(Arc::clone(meta));
        }

        let limit = self.registry.config.max_depth;
        if self.depth >= limit {
            return Err(ResolveError::DepthExceeded {
                ty: key.to_string(),
                limit,
            });
        }

        let placeholder = TypeMetadata::placeholder(key.clone());
        self.cache.insert(key.clone(), Arc::clone(&placeholder));
        let mark = self.inserted.len();
        self.inserted.push(key.clone());

        debug!("building strategies for {key} (depth {})", self.depth);
        self.depth += 1;
        let builder = Arc::clone(&self.registry.builder);
        let built = builder.build(ty, key.modifiers, self);
        self.depth -= 1;

        match built {
            Ok(strategies) => {
                placeholder.complete(strategies);
                self.registry.stats.record_build();
                Ok(placeholder)
            }
            Err(err) => {
                // Entries built on top of this one may hold its placeholder.
                for stale in self.inserted.drain(mark..) {
                    self.cache.remove(&stale);
                }
                self.registry.stats.record_failure();
                warn!("strategy build for {key} failed, entry rolled back: {err}");
                Err(err)
            }
        }
    }
}

impl NestedResolver for BuildSession<'_> {
    fn resolve(
        &mut self,
        ty: &TypeRef,
        modifiers: ModifierSet,
    ) -> Result<MetadataHandle, ResolveError> {
        self.resolve_key(ty, TypeKey::new(ty, modifiers))
    }

    fn fields(&mut self, ty: &TypeRef) -> Result<Vec<FieldDescriptor>, ResolveError> {
        FieldEnumerator::enumerate(ty, self)
    }
}
