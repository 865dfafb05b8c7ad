//! Shared Cache Module
//!
//! Thread-safe wrapper around [`CacheStore`] used by concurrent requests.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{CacheKey, CacheStats, CacheStore};

/// Whether a value came from the store or from the downstream operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }
}

// == Response Cache ==
/// Cloneable handle to a single process-wide store.
///
/// The lock is held only for the lookup and the write, never while the
/// downstream operation is in flight.
pub struct ResponseCache<V> {
    store: Arc<RwLock<CacheStore<V>>>,
}

impl<V> Clone for ResponseCache<V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<V: Clone> ResponseCache<V> {
    pub fn new(store: CacheStore<V>) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(CacheStore::new(capacity))
    }

    /// Looks up a live value. Takes the write lock since expired entries are
    /// dropped on read.
    pub async fn get(&self, key: &CacheKey) -> Option<V> {
        self.store.write().await.get(key.as_str())
    }

    pub async fn set(&self, key: CacheKey, value: V, ttl: Duration) {
        self.store.write().await.set(key.into_string(), value, ttl);
    }

    // == Get Or Fetch ==
    /// Serves `key` from the store, or runs `fetch` and stores its result.
    ///
    /// A failed fetch is propagated untouched and nothing is stored, so the
    /// next request for the same key runs `fetch` again. Concurrent misses on
    /// one key each run `fetch`; the last write wins.
    pub async fn get_or_fetch<F, Fut, E>(
        &self,
        key: CacheKey,
        ttl: Duration,
        fetch: F,
    ) -> Result<(V, CacheStatus), E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key).await {
            debug!(path = key.path(), "Cache hit");
            return Ok((value, CacheStatus::Hit));
        }

        debug!(path = key.path(), "Cache miss, invoking downstream");
        let value = fetch().await?;
        self.set(key, value.clone(), ttl).await;
        Ok((value, CacheStatus::Miss))
    }

    /// Removes every expired entry, returning how many were dropped.
    pub async fn purge_expired(&self) -> usize {
        self.store.write().await.purge_expired()
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn capacity(&self) -> usize {
        self.store.read().await.capacity()
    }
}
