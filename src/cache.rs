use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// Fixed-capacity memo with first-in-first-out eviction.
///
/// Entries are never refreshed or expired; once the cache is full the oldest
/// inserted key makes room for the new one. A capacity of zero disables
/// memoization entirely.
#[derive(Debug, Clone)]
pub struct BoundedCache<K, V> {
    capacity: usize,
    entries: HashMap<K, V>,
    order: VecDeque<K>,
    hits: u64,
    misses: u64,
}

impl<K, V> BoundedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity.min(1024)),
            order: VecDeque::with_capacity(capacity.min(1024)),
            hits: 0,
            misses: 0,
        }
    }

    pub fn get(&mut self, key: &K) -> Option<V> {
        match self.entries.get(key) {
            Some(v) => {
                self.hits += 1;
                Some(v.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }
        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = value;
            return;
        }
        while self.entries.len() >= self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, value);
    }

    /// Returns the cached value or computes, stores and returns a new one.
    /// Errors are passed through and never cached.
    pub fn get_or_try_insert_with<E>(
        &mut self,
        key: K,
        f: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        if let Some(v) = self.get(&key) {
            return Ok(v);
        }
        let value = f()?;
        self.insert(key, value.clone());
        Ok(value)
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

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_insert_first() {
        let mut cache = BoundedCache::new(2);
        cache.insert(1, "a");
        cache.insert(2, "b");
        // Reading does not refresh position.
        assert_eq!(cache.get(&1), Some("a"));
        cache.insert(3, "c");
        assert!(!cache.contains(&1));
        assert!(cache.contains(&2));
        assert!(cache.contains(&3));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn overwrite_keeps_slot() {
        let mut cache = BoundedCache::new(2);
        cache.insert(1, 10);
        cache.insert(2, 20);
        cache.insert(1, 11);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&1), Some(11));
        cache.insert(3, 30);
        assert!(!cache.contains(&1));
    }

    #[test]
    fn zero_capacity_never_stores() {
        let mut cache = BoundedCache::new(0);
        cache.insert("k", 1);
        assert!(cache.is_empty());
        assert_eq!(cache.get(&"k"), None);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn errors_are_not_cached() {
        let mut cache: BoundedCache<u32, u32> = BoundedCache::new(4);
        let err: Result<u32, &str> = cache.get_or_try_insert_with(7, || Err("down"));
        assert!(err.is_err());
        assert!(!cache.contains(&7));

        let mut calls = 0;
        for _ in 0..3 {
            let v: Result<u32, &str> = cache.get_or_try_insert_with(7, || {
                calls += 1;
                Ok(42)
            });
            assert_eq!(v, Ok(42));
        }
        assert_eq!(calls, 1);
        assert_eq!(cache.hits(), 2);
    }
}
