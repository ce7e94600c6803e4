// param/cache.rs
//
// Memo table with lookup metrics, one per substitution and member kind.

use std::cell::Cell;
use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;

#[derive(Debug)]
pub struct SubstCache<K, V> {
    entries: FxHashMap<K, V>,
    hits: Cell<u32>,
    misses: Cell<u32>,
}

impl<K, V> Default for SubstCache<K, V> {
    fn default() -> Self {
        Self {
            entries: FxHashMap::default(),
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }
}

impl<K: Eq + Hash, V> SubstCache<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let result = self.entries.get(key);
        if result.is_some() {
            self.hits.set(self.hits.get() + 1);
        } else {
            self.misses.set(self.misses.get() + 1);
        }
        result
    }

    /// Entries are never replaced; the first result stored for a key is the
    /// canonical one.
    pub fn insert(&mut self, key: K, value: V) {
        self.entries.entry(key).or_insert(value);
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits.get(),
            misses: self.misses.get(),
        }
    }

    pub fn clear_metrics(&self) {
        self.hits.set(0);
        self.misses.set(0);
    }
}

/// Aggregated cache metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u32,
    pub misses: u32,
}

impl CacheStats {
    pub fn lookups(&self) -> u32 {
        self.hits + self.misses
    }

    /// Hit rate as a percentage (0.0 - 100.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.lookups();
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }

    pub fn merge(self, other: CacheStats) -> CacheStats {
        CacheStats {
            entries: self.entries + other.entries,
            hits: self.hits + other.hits,
            misses: self.misses + other.misses,
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "entries: {}, lookups: {} (hits: {}, misses: {}, hit_rate: {:.1}%)",
            self.entries,
            self.lookups(),
            self.hits,
            self.misses,
            self.hit_rate()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_hits_and_misses() {
        let mut cache: SubstCache<u32, &str> = SubstCache::new();
        assert_eq!(cache.get(&1), None);
        cache.insert(1, "one");
        assert_eq!(cache.get(&1), Some(&"one"));
        assert_eq!(cache.get(&1), Some(&"one"));
        let stats = cache.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
        cache.clear_metrics();
        assert_eq!(cache.stats().lookups(), 0);
    }

    #[test]
    fn first_insert_wins() {
        let mut cache: SubstCache<u32, u32> = SubstCache::new();
        cache.insert(7, 1);
        cache.insert(7, 2);
        assert_eq!(cache.get(&7), Some(&1));
    }
}
