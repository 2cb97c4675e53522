//! Cache interface trait for abstracted caching operations.

use async_trait::async_trait;
use pantry_core::{Interface, PantryResult};
use std::time::Duration;

/// Cache interface for storing and retrieving cached data.
///
/// Values are JSON strings so the trait stays dyn-compatible. Callers treat
/// every backend as unreliable: `Ok(None)` is a miss, and any `Err` is a
/// soft failure to log and fall back from.
#[async_trait]
pub trait CacheInterface: Interface + Send + Sync {
    /// Get a raw JSON value from the cache.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    async fn get_raw(&self, key: &str) -> PantryResult<Option<String>>;

    /// Set a raw JSON value in the cache with a TTL.
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> PantryResult<()>;

    /// Check if caching is enabled.
    fn is_enabled(&self) -> bool;
}
