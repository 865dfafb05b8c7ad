//! Cache Store Module
//!
//! Bounded key-value storage with per-entry expiry and oldest-insertion eviction.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::cache::key::key_path;
use crate::cache::{CacheEntry, CacheStats, InsertionOrder};

// == Cache Store ==
/// Bounded cache storage.
///
/// Capacity bounds memory and TTL bounds staleness independently. Expired
/// entries are treated as absent on read and removed lazily, or eagerly by
/// [`CacheStore::purge_expired`]. Store operations never fail.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Write order, oldest first
    order: InsertionOrder,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
            order: InsertionOrder::new(),
            stats: CacheStats::new(),
            capacity,
        }
    }

    // == Set ==
    /// Stores `value` under `key` for `ttl`.
    ///
    /// An existing key is overwritten without counting against capacity. A new
    /// key on a full store first evicts the oldest inserted entry.
    pub fn set(&mut self, key: String, value: V, ttl: Duration) {
        self.set_at(key, value, ttl, Instant::now());
    }

    pub(crate) fn set_at(&mut self, key: String, value: V, ttl: Duration, now: Instant) {
        if self.capacity == 0 {
            return;
        }

        let is_overwrite = self.entries.contains_key(&key);

        if !is_overwrite && self.entries.len() >= self.capacity {
            if let Some(evicted_key) = self.order.pop_oldest() {
                self.entries.remove(&evicted_key);
                self.stats.record_eviction();
                debug!(path = key_path(&evicted_key), "Evicted oldest cache entry");
            }
        }

        self.entries
            .insert(key.clone(), CacheEntry::new(value, ttl, now));
        self.order.record_insert(&key);
        self.stats.set_entries(self.entries.len());
    }

    // == Get ==
    /// Returns the value stored under `key` if it is present and still live.
    ///
    /// A never-set key and an expired key both yield `None`. An expired entry
    /// found here is dropped on the spot.
    pub fn get(&mut self, key: &str) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    pub(crate) fn get_at(&mut self, key: &str, now: Instant) -> Option<V> {
        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired_at(now) => {
                let value = entry.value.clone();
                self.stats.record_hit();
                return Some(value);
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.entries.remove(key);
            self.order.remove(key);
            self.stats.record_expirations(1);
            self.stats.set_entries(self.entries.len());
        }

        self.stats.record_miss();
        None
    }

    // == Purge Expired ==
    /// Removes all expired entries and returns how many were dropped.
    pub fn purge_expired(&mut self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    pub(crate) fn purge_expired_at(&mut self, now: Instant) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.entries.remove(key);
            self.order.remove(key);
        }

        self.stats.record_expirations(expired_keys.len());
        self.stats.set_entries(self.entries.len());
        expired_keys.len()
    }

    // == Stats ==
    /// Returns a snapshot of the store statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_entries(self.entries.len());
        stats
    }

    /// Returns the number of stored entries, expired-but-unswept included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TTL: Duration = Duration::from_secs(300);

    #[test]
    fn test_store_new() {
        let store: CacheStore<String> = CacheStore::new(100);
        assert_eq!(store.len(), 0);
        assert_eq!(store.capacity(), 100);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = CacheStore::new(100);

        store.set("key1".to_string(), "value1".to_string(), TTL);

        assert_eq!(store.get("key1"), Some("value1".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store: CacheStore<String> = CacheStore::new(100);
        assert_eq!(store.get("nonexistent"), None);
    }

    #[test]
    fn test_product_lookup_expires_after_ttl() {
        let mut store = CacheStore::new(100);
        let t0 = Instant::now();
        let body = json!({"title": "X"});

        store.set_at("/amazon/products/B001".to_string(), body.clone(), TTL, t0);

        assert_eq!(store.get_at("/amazon/products/B001", t0), Some(body.clone()));
        assert_eq!(
            store.get_at("/amazon/products/B001", t0 + Duration::from_secs(299)),
            Some(body)
        );
        assert_eq!(
            store.get_at("/amazon/products/B001", t0 + Duration::from_secs(301)),
            None
        );
        assert!(store.is_empty(), "expired entry is dropped on read");
    }

    #[test]
    fn test_store_overwrite_does_not_evict() {
        let mut store = CacheStore::new(2);

        store.set("key1".to_string(), "value1".to_string(), TTL);
        store.set("key2".to_string(), "value2".to_string(), TTL);
        store.set("key1".to_string(), "updated".to_string(), TTL);

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("key1"), Some("updated".to_string()));
        assert_eq!(store.get("key2"), Some("value2".to_string()));
        assert_eq!(store.stats().evictions, 0);
    }

    #[test]
    fn test_store_overwrite_resets_ttl() {
        let mut store = CacheStore::new(10);
        let t0 = Instant::now();

        store.set_at("key".to_string(), 1, TTL, t0);
        store.set_at("key".to_string(), 2, TTL, t0 + Duration::from_secs(200));

        assert_eq!(store.get_at("key", t0 + Duration::from_secs(400)), Some(2));
    }

    #[test]
    fn test_store_evicts_oldest_insertion() {
        let mut store = CacheStore::new(2);

        store.set("K1".to_string(), 1, TTL);
        store.set("K2".to_string(), 2, TTL);
        store.set("K3".to_string(), 3, TTL);

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("K1"), None);
        assert_eq!(store.get("K2"), Some(2));
        assert_eq!(store.get("K3"), Some(3));
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_reads_do_not_protect_from_eviction() {
        let mut store = CacheStore::new(2);

        store.set("K1".to_string(), 1, TTL);
        store.set("K2".to_string(), 2, TTL);
        assert_eq!(store.get("K1"), Some(1));
        store.set("K3".to_string(), 3, TTL);

        assert_eq!(store.get("K1"), None);
        assert_eq!(store.get("K2"), Some(2));
    }

    #[test]
    fn test_store_overwrite_refreshes_insertion_order() {
        let mut store = CacheStore::new(2);

        store.set("K1".to_string(), 1, TTL);
        store.set("K2".to_string(), 2, TTL);
        store.set("K1".to_string(), 10, TTL);
        store.set("K3".to_string(), 3, TTL);

        assert_eq!(store.get("K2"), None);
        assert_eq!(store.get("K1"), Some(10));
    }

    #[test]
    fn test_store_zero_capacity_keeps_nothing() {
        let mut store = CacheStore::new(0);

        store.set("key".to_string(), 1, TTL);

        assert!(store.is_empty());
        assert_eq!(store.get("key"), None);
    }

    #[test]
    fn test_store_accepts_unbounded_ttl() {
        let mut store = CacheStore::new(10);

        store.set("key".to_string(), 1, Duration::from_secs(u64::MAX));
        store.set("max".to_string(), 2, Duration::MAX);

        assert_eq!(store.get("key"), Some(1));
        assert_eq!(store.get("max"), Some(2));
    }

    #[test]
    fn test_store_stats() {
        let mut store = CacheStore::new(100);
        let t0 = Instant::now();

        store.set_at("key1".to_string(), 1, TTL, t0);
        store.set_at("key2".to_string(), 2, Duration::from_secs(1), t0);
        store.get_at("key1", t0); // hit
        store.get_at("nonexistent", t0); // miss
        store.get_at("key2", t0 + Duration::from_secs(2)); // expired miss

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn test_store_purge_expired() {
        let mut store = CacheStore::new(100);
        let t0 = Instant::now();

        store.set_at("key1".to_string(), 1, Duration::from_secs(1), t0);
        store.set_at("key2".to_string(), 2, Duration::from_secs(10), t0);

        let removed = store.purge_expired_at(t0 + Duration::from_secs(2));

        assert_eq!(removed, 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_at("key2", t0 + Duration::from_secs(2)), Some(2));
    }

    #[test]
    fn test_purged_key_is_not_evicted_later() {
        let mut store = CacheStore::new(2);
        let t0 = Instant::now();

        store.set_at("short".to_string(), 1, Duration::from_secs(1), t0);
        store.set_at("long".to_string(), 2, TTL, t0);
        store.purge_expired_at(t0 + Duration::from_secs(5));
        store.set_at("new".to_string(), 3, TTL, t0 + Duration::from_secs(5));

        assert_eq!(store.len(), 2);
        assert_eq!(store.stats().evictions, 0);
        assert_eq!(store.get_at("long", t0 + Duration::from_secs(5)), Some(2));
    }
}
