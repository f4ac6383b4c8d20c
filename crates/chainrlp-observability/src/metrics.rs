//! Registry metrics.
//!
//! Counters are fed from [`StatsSnapshot`] deltas, so the registry itself
//! stays free of any exporter dependency.

use chainrlp_registry::{StatsSnapshot, TypeRegistry};
use opentelemetry::{
    metrics::{Counter, Meter},
    KeyValue,
};
use std::sync::Mutex;

/// OpenTelemetry counters for one registry.
pub struct RegistryMetrics {
    pub cache_hits: Counter<u64>,
    pub cache_misses: Counter<u64>,
    pub builds: Counter<u64>,
    pub build_failures: Counter<u64>,
    pub placeholder_hits: Counter<u64>,
    attributes: Vec<KeyValue>,
    last: Mutex<StatsSnapshot>,
}

impl RegistryMetrics {
    /// `name` tags every data point, to tell registries apart.
    pub fn new(meter: &Meter, name: &str) -> Self {
        Self {
            cache_hits: meter
                .u64_counter("chainrlp.cache_hits")
                .with_description("Type lookups served from the read-locked fast path")
                .init(),
            cache_misses: meter
                .u64_counter("chainrlp.cache_misses")
                .with_description("Type lookups that had to take the write lock")
                .init(),
            builds: meter
                .u64_counter("chainrlp.builds")
                .with_description("Strategy builds that completed")
                .init(),
            build_failures: meter
                .u64_counter("chainrlp.build_failures")
                .with_description("Strategy builds that failed and were rolled back")
                .init(),
            placeholder_hits: meter
                .u64_counter("chainrlp.placeholder_hits")
                .with_description("Recursive type references answered by a placeholder")
                .init(),
            attributes: vec![KeyValue::new("registry", name.to_string())],
            last: Mutex::new(StatsSnapshot::default()),
        }
    }

    /// Record counter growth since the previous call. Returns the delta.
    pub fn observe(&self, registry: &TypeRegistry) -> StatsSnapshot {
        let current = registry.stats();
        let delta = {
            let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
            let delta = current.since(&last);
            *last = current;
            delta
        };
        self.record(&delta);
        delta
    }

    pub fn record(&self, delta: &StatsSnapshot) {
        self.cache_hits.add(delta.hits, &self.attributes);
        self.cache_misses.add(delta.misses, &self.attributes);
        self.builds.add(delta.builds, &self.attributes);
        self.build_failures.add(delta.failures, &self.attributes);
        self.placeholder_hits
            .add(delta.placeholder_hits, &self.attributes);
    }
}
