/*!
 * Metadata Cache
 * Bounded LRU cache of stat results keyed by normalized path
 */

use lru::LruCache;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use super::path;
use super::types::Inode;

/// Stat cache with LRU eviction
///
/// The cache is only a shortcut for repeated `stat` calls. Mutating
/// operations invalidate the affected paths before they return and
/// never read from it.
pub struct MetadataCache {
    entries: Mutex<LruCache<String, Inode>>,
    /// Bumped under the entries lock by every invalidation
    generation: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl MetadataCache {
    /// Create a cache holding at most `capacity` entries (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            generation: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Cached snapshot for a path, promoting it to most-recently-used
    pub fn get(&self, path: &str) -> Option<Inode> {
        let found = self.entries.lock().get(path).cloned();
        match found {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        found
    }

    /// Store a snapshot, evicting the least-recently-used entry when full
    ///
    /// Returns the evicted path, if any.
    pub fn insert(&self, path: String, inode: Inode) -> Option<String> {
        let mut entries = self.entries.lock();
        match entries.push(path.clone(), inode) {
            Some((evicted, _)) if evicted != path => {
                self.evictions.fetch_add(1, Ordering::Relaxed);
                Some(evicted)
            }
            _ => None,
        }
    }

    /// Store a snapshot only if no invalidation happened since `generation`
    ///
    /// Lets a reader that resolved the inode outside the lock avoid
    /// publishing a snapshot a concurrent writer has already superseded.
    pub fn insert_if_current(&self, path: String, inode: Inode, generation: u64) -> bool {
        let mut entries = self.entries.lock();
        if self.generation.load(Ordering::Acquire) != generation {
            return false;
        }
        if let Some((evicted, _)) = entries.push(path.clone(), inode) {
            if evicted != path {
                self.evictions.fetch_add(1, Ordering::Relaxed);
            }
        }
        true
    }

    /// Current invalidation generation
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Drop the entry for exactly this path
    pub fn invalidate(&self, path: &str) {
        let mut entries = self.entries.lock();
        self.generation.fetch_add(1, Ordering::AcqRel);
        entries.pop(path);
    }

    /// Drop the entry for `prefix` and every path below it
    pub fn invalidate_prefix(&self, prefix: &str) {
        let mut entries = self.entries.lock();
        self.generation.fetch_add(1, Ordering::AcqRel);
        let doomed: Vec<String> = entries
            .iter()
            .filter(|(cached, _)| path::is_ancestor(prefix, cached))
            .map(|(cached, _)| cached.clone())
            .collect();
        for cached in doomed {
            entries.pop(&cached);
        }
    }

    /// Check for an entry without touching recency or counters
    pub fn contains(&self, path: &str) -> bool {
        self.entries.lock().contains(path)
    }

    /// Clear entire cache
    pub fn clear(&self) {
        let mut entries = self.entries.lock();
        self.generation.fetch_add(1, Ordering::AcqRel);
        entries.clear();
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.lock();
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        CacheStats {
            size: entries.len(),
            capacity: entries.cap().get(),
            hits,
            misses,
            evictions: self.evictions.load(Ordering::Relaxed),
            hit_rate,
        }
    }
}

impl std::fmt::Debug for MetadataCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataCache")
            .field("stats", &self.stats())
            .finish()
    }
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub size: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub hit_rate: f64,
}
