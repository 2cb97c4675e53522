//! Redis-based cache implementation.

use super::CacheInterface;
use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Config, Pool, PoolConfig, Runtime};
use pantry_core::{PantryError, PantryResult};
use std::time::Duration;
use tracing::debug;

/// Default TTL for cached items (5 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Redis-based cache service.
///
/// A disabled instance behaves as an always-empty cache that ignores writes.
#[derive(Clone)]
pub struct RedisCacheService {
    pool: Option<Pool>,
}

impl RedisCacheService {
    /// Create a new Redis cache service.
    #[must_use]
    pub fn new(pool: Pool) -> Self {
        Self { pool: Some(pool) }
    }

    /// Builds a connection pool for `url`.
    ///
    /// Connections are opened lazily, so this succeeds even while Redis is
    /// unreachable.
    pub fn connect(url: &str, pool_size: u32) -> PantryResult<Self> {
        let mut config = Config::from_url(url);
        config.pool = Some(PoolConfig::new(pool_size.max(1) as usize));

        let pool = config
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| PantryError::Cache(format!("Failed to create Redis pool: {e}")))?;

        Ok(Self::new(pool))
    }

    /// Create a no-op cache service (for when Redis is disabled).
    #[must_use]
    pub fn disabled() -> Self {
        Self { pool: None }
    }

    async fn get_conn(&self) -> PantryResult<deadpool_redis::Connection> {
        match &self.pool {
            Some(pool) => pool.get().await.map_err(|e| {
                PantryError::Cache(format!("Failed to get Redis connection: {e}"))
            }),
            None => Err(PantryError::Cache("Cache is disabled".to_string())),
        }
    }
}

#[async_trait]
impl CacheInterface for RedisCacheService {
    fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    async fn get_raw(&self, key: &str) -> PantryResult<Option<String>> {
        if !self.is_enabled() {
            return Ok(None);
        }

        let mut conn = self.get_conn().await?;
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| PantryError::Cache(format!("Failed to get key '{key}': {e}")))?;

        match &value {
            Some(_) => debug!(cache_key = key, "Cache hit"),
            None => debug!(cache_key = key, "Cache miss"),
        }

        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> PantryResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let mut conn = self.get_conn().await?;
        let ttl_secs = ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .map_err(|e| PantryError::Cache(format!("Failed to set key '{key}': {e}")))?;

        debug!(cache_key = key, ttl_secs, "Cached value");
        Ok(())
    }
}

impl std::fmt::Debug for RedisCacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCacheService")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
