//! Dependency wiring.
//!
//! Every handle is constructed here and passed down explicitly. The
//! container owns the `Arc`s; services only hold clones of them.

use pantry_config::{AppConfig, RedisConfig};
use pantry_repository::{DatabasePoolInterface, PostgresProductRepository, ProductRepository};
use pantry_service::{
    CacheInterface, CacheSettings, CachedProductService, ProductService, RedisCacheService,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Shared handles for one running server.
#[derive(Clone)]
pub struct ServiceContainer {
    pub repository: Arc<dyn ProductRepository>,
    pub cache: Arc<dyn CacheInterface>,
    pub product_service: Arc<dyn ProductService>,
}

impl ServiceContainer {
    /// Wires the PostgreSQL repository and the configured cache.
    pub fn build(config: &AppConfig, database: Arc<dyn DatabasePoolInterface>) -> Self {
        let repository: Arc<dyn ProductRepository> =
            Arc::new(PostgresProductRepository::new(database));

        Self::with_components(
            repository,
            build_cache(&config.redis),
            CacheSettings::from_config(&config.cache),
        )
    }

    /// Wires the product service over existing components.
    pub fn with_components(
        repository: Arc<dyn ProductRepository>,
        cache: Arc<dyn CacheInterface>,
        settings: CacheSettings,
    ) -> Self {
        let product_service: Arc<dyn ProductService> = Arc::new(CachedProductService::new(
            repository.clone(),
            cache.clone(),
            settings,
        ));

        Self {
            repository,
            cache,
            product_service,
        }
    }
}

/// Builds the Redis cache, or a disabled one when Redis is switched off or
/// its pool cannot be created.
pub fn build_cache(config: &RedisConfig) -> Arc<dyn CacheInterface> {
    if !config.enabled {
        info!("Redis cache disabled by configuration");
        return Arc::new(RedisCacheService::disabled());
    }

    match RedisCacheService::connect(&config.url, config.pool_size) {
        Ok(cache) => {
            info!(pool_size = config.pool_size, "Redis cache pool created");
            Arc::new(cache)
        }
        Err(e) => {
            warn!(error = %e, "Running without cache");
            Arc::new(RedisCacheService::disabled())
        }
    }
}
