//! Cache counters.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters, updated lock-free by the registry.
#[derive(Debug, Default)]
pub struct RegistryStats {
    hits: AtomicU64,
    misses: AtomicU64,
    builds: AtomicU64,
    failures: AtomicU64,
    placeholder_hits: AtomicU64,
}

/// Point-in-time copy of [`RegistryStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that missed the read-locked fast path
    pub misses: u64,
    /// Successful strategy builds
    pub builds: u64,
    /// Failed builds (entry rolled back)
    pub failures: u64,
    /// Recursive lookups that stopped at a placeholder
    pub placeholder_hits: u64,
}

impl RegistryStats {
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_build(&self) {
        self.builds.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_placeholder_hit(&self) {
        self.placeholder_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            builds: self.builds.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            placeholder_hits: self.placeholder_hits.load(Ordering::Relaxed),
        }
    }
}

impl StatsSnapshot {
    /// Counter growth since `earlier`.
    pub fn since(&self, earlier: &StatsSnapshot) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits.saturating_sub(earlier.hits),
            misses: self.misses.saturating_sub(earlier.misses),
            builds: self.builds.saturating_sub(earlier.builds),
            failures: self.failures.saturating_sub(earlier.failures),
            placeholder_hits: self.placeholder_hits.saturating_sub(earlier.placeholder_hits),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_delta() {
        let stats = RegistryStats::default();
        stats.record_hit();
        let before = stats.snapshot();
        stats.record_hit();
        stats.record_miss();
        stats.record_build();
        let delta = stats.snapshot().since(&before);
        assert_eq!(
            delta,
            StatsSnapshot {
                hits: 1,
                misses: 1,
                builds: 1,
                failures: 0,
                placeholder_hits: 0,
            }
        );
    }
}
