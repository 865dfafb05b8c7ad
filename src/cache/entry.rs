//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with an absolute expiry.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// A stored value together with its insertion and expiry instants.
///
/// Entries are never mutated in place; a refresh replaces the whole entry.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// When the entry was written
    pub inserted_at: Instant,
    /// When the entry stops being served
    pub expires_at: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry written at `now` that lives for `ttl`.
    pub fn new(value: V, ttl: Duration, now: Instant) -> Self {
        Self {
            value,
            inserted_at: now,
            expires_at: expiry_after(now, ttl),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired as of `now`.
    ///
    /// Boundary condition: an entry is expired once `now >= expires_at`, so a
    /// fully elapsed TTL is never served.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

// == Expiry Instant ==
/// Roughly thirty years; stands in for a TTL too large to add to an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// `now + ttl`, clamped to [`FAR_FUTURE`] when the sum would overflow.
fn expiry_after(now: Instant, ttl: Duration) -> Instant {
    now.checked_add(ttl)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}
