//! Bounded interning cache for object keys produced by the decoder.
//!
//! Scoped to a single `decode` call rather than shared process-wide: a
//! per-call cache sidesteps needing a `no_std`-friendly global mutex for a
//! win that only matters within one document anyway.
//! Keys longer than [`MAX_KEY_LEN`] bypass the cache entirely; the table
//! itself holds at most [`CAPACITY`] entries and is cleared outright once
//! full rather than doing per-entry LRU bookkeeping.

use alloc::collections::BTreeMap;
use alloc::string::String;
use core::hash::{BuildHasher, BuildHasherDefault, Hasher};

use ahash::AHasher;

const MAX_KEY_LEN: usize = 64;
const CAPACITY: usize = 4096;

pub(crate) struct KeyCache {
    // Keyed by (hash, len) to avoid storing the raw bytes twice; collisions
    // fall back to allocating a fresh String, which is always correct.
    entries: BTreeMap<(u64, usize), String>,
}

impl KeyCache {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Produce an owned `String` for a decoded key. A hit confirms the key
    /// has been seen before (letting callers skip, e.g., an interned-symbol
    /// lookup elsewhere); this cache's `Object` representation still needs
    /// its own owned copy per entry, so a hit costs a clone rather than a
    /// fresh decode-and-compare.
    pub(crate) fn intern(&mut self, key: &str) -> String {
        if key.len() > MAX_KEY_LEN {
            return String::from(key);
        }

        let hash = hash_str(key);
        let slot = (hash, key.len());

        if let Some(existing) = self.entries.get(&slot) {
            if existing == key {
                return existing.clone();
            }
            // Hash collision between differently-keyed strings of equal
            // length: don't cache, just allocate.
            return String::from(key);
        }

        if self.entries.len() >= CAPACITY {
            self.entries.clear();
        }
        let owned = String::from(key);
        self.entries.insert(slot, owned.clone());
        owned
    }
}

fn hash_str(s: &str) -> u64 {
    let mut hasher = BuildHasherDefault::<AHasher>::default().build_hasher();
    hasher.write(s.as_bytes());
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn reuses_allocation_for_repeated_key() {
        let mut cache = KeyCache::new();
        let a = cache.intern("name");
        let b = cache.intern("name");
        assert_eq!(a, b);
        assert_eq!(a, "name".to_string());
    }

    #[test]
    fn bypasses_cache_for_long_keys() {
        let mut cache = KeyCache::new();
        let long = "x".repeat(MAX_KEY_LEN + 1);
        let a = cache.intern(&long);
        assert_eq!(a, long);
        assert!(cache.entries.is_empty());
    }

    #[test]
    fn bounded_under_many_distinct_keys() {
        let mut cache = KeyCache::new();
        for i in 0..(CAPACITY * 4) {
            let key = alloc::format!("k{i}");
            cache.intern(&key);
        }
        assert!(cache.entries.len() <= CAPACITY);
    }
}
