//! Cache Module
//!
//! In-memory response caching with per-entry TTL and oldest-insertion
//! eviction, plus the axum middleware that puts it in front of handlers.

mod entry;
mod key;
mod middleware;
mod order;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use key::CacheKey;
pub use middleware::{cache_responses, CachePolicy, CachedResponse, X_CACHE};
pub use order::InsertionOrder;
pub use shared::{CacheStatus, ResponseCache};
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Default maximum number of cached responses
pub const DEFAULT_CAPACITY: usize = 100;

/// Default time-to-live of a cached response in seconds
pub const DEFAULT_TTL_SECS: u64 = 300;

/// Largest response body the middleware will buffer for caching
pub const MAX_BODY_SIZE: usize = 10 * 1024 * 1024; // 10 MB
