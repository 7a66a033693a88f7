//! Match result caching.
//!
//! [`MatchCache`] remembers which table entry a clean path resolved to, so
//! repeated navigations to the same paths skip the linear scan. It is gated
//! behind the `cache` feature and uses the [`lru`] crate.
//!
//! The route table never changes after construction, so entries never go
//! stale; the cache only evicts by recency. A cached `None` means the path
//! resolved to the not-found route.
//!
//! ```
//! use spa_navigator::cache::MatchCache;
//!
//! let mut cache = MatchCache::new();
//! assert_eq!(cache.get("/about"), None);
//! cache.insert("/about".to_string(), Some(1));
//!
//! assert_eq!(cache.get("/about"), Some(Some(1)));
//! assert_eq!(cache.stats().hits, 1);
//! assert_eq!(cache.stats().misses, 1);
//! ```

use crate::trace_log;
use lru::LruCache;
use std::num::NonZeroUsize;

/// Counters tracking cache effectiveness.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

impl CacheStats {
    /// Hit rate as a value in `0.0..=1.0`; `0.0` before any lookup.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU map from clean path to matched table index.
#[derive(Debug)]
pub struct MatchCache {
    entries: LruCache<String, Option<usize>>,
    stats: CacheStats,
}

impl MatchCache {
    const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(256) {
        Some(capacity) => capacity,
        None => NonZeroUsize::MIN,
    };

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            entries: LruCache::new(capacity),
            stats: CacheStats::default(),
        }
    }

    /// Look up a path. Outer `None` is a miss; `Some(None)` is a cached
    /// not-found result.
    pub fn get(&mut self, path: &str) -> Option<Option<usize>> {
        if let Some(index) = self.entries.get(path) {
            self.stats.hits += 1;
            trace_log!("Match cache hit for '{}'", path);
            Some(*index)
        } else {
            self.stats.misses += 1;
            trace_log!("Match cache miss for '{}'", path);
            None
        }
    }

    pub fn insert(&mut self, path: String, index: Option<usize>) {
        self.entries.put(path, index);
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MatchCache {
    fn default() -> Self {
        Self::new()
    }
}
