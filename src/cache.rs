use lru::LruCache;
use std::num::NonZeroUsize;

use crate::core::cluster::ClusterOutcome;
use crate::models::BoundingBox;

/// Cache key for one clustering result.
///
/// The dataset version is caller-owned and monotonic: bump it whenever the
/// listing collection changes identity, and stale entries can never hit.
/// Viewport edges are quantized so floating-point jitter from map libraries
/// still lands on the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClusterCacheKey {
    dataset_version: u64,
    zoom: u8,
    west_q: i64,
    south_q: i64,
    east_q: i64,
    north_q: i64,
}

impl ClusterCacheKey {
    /// Quantization step for viewport edges, about 0.1m of longitude.
    const QUANTUM: f64 = 1e-6;

    pub fn new(dataset_version: u64, zoom: u8, viewport: &BoundingBox) -> Self {
        Self {
            dataset_version,
            zoom,
            west_q: Self::quantize(viewport.west),
            south_q: Self::quantize(viewport.south),
            east_q: Self::quantize(viewport.east),
            north_q: Self::quantize(viewport.north),
        }
    }

    pub fn dataset_version(&self) -> u64 {
        self.dataset_version
    }

    fn quantize(value: f64) -> i64 {
        (value / Self::QUANTUM).round() as i64
    }
}

/// LRU memo of clustering passes.
///
/// Optional layer over the pure cluster engine for callers that re-cluster
/// on every map "moveend" event. Correctness never depends on it: a miss
/// just recomputes.
pub struct ClusterCache {
    entries: LruCache<ClusterCacheKey, ClusterOutcome>,
}

impl ClusterCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
        }
    }

    pub fn get(&mut self, key: &ClusterCacheKey) -> Option<&ClusterOutcome> {
        let hit = self.entries.get(key);
        if hit.is_some() {
            tracing::trace!("Cluster cache hit at zoom {}", key.zoom);
        } else {
            tracing::trace!("Cluster cache miss at zoom {}", key.zoom);
        }
        hit
    }

    pub fn insert(&mut self, key: ClusterCacheKey, outcome: ClusterOutcome) {
        self.entries.put(key, outcome);
    }

    /// Drop every entry that does not belong to `current_version`.
    ///
    /// Old versions can never hit anyway (the version is part of the key);
    /// this just releases their memory eagerly.
    pub fn invalidate_dataset(&mut self, current_version: u64) {
        let stale: Vec<ClusterCacheKey> = self
            .entries
            .iter()
            .filter(|(key, _)| key.dataset_version != current_version)
            .map(|(key, _)| *key)
            .collect();
        for key in &stale {
            self.entries.pop(key);
        }
        if !stale.is_empty() {
            tracing::debug!("Invalidated {} stale cluster cache entries", stale.len());
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
