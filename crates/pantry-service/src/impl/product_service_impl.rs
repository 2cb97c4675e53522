//! Read-through cached product service.

use crate::cache::{cache_keys, CacheInterface, DEFAULT_TTL};
use crate::product_service::ProductService;
use async_trait::async_trait;
use pantry_config::CacheConfig;
use pantry_core::{
    ListFilter, NewProduct, PantryError, PantryResult, Product, ProductId, ProductPage,
};
use pantry_repository::ProductRepository;
use pantry_resilience::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Tuning for the cache in front of the store.
#[derive(Debug, Clone)]
pub struct CacheSettings {
    /// Time-to-live of every entry written by the service.
    pub ttl: Duration,
    /// Retry applied to cache reads on the get-by-id path only.
    pub read_retry: RetryPolicy,
}

impl CacheSettings {
    #[must_use]
    pub fn from_config(config: &CacheConfig) -> Self {
        Self {
            ttl: config.ttl(),
            read_retry: RetryPolicy::exponential(
                config.read_attempts,
                config.retry_initial_delay(),
            ),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            read_retry: RetryPolicy::exponential(3, Duration::from_millis(10)),
        }
    }
}

/// A cached list entry.
///
/// Current entries carry the total alongside the page. Bare arrays written
/// by older deployments are still read, reporting the page length as the
/// total.
#[derive(Deserialize)]
#[serde(untagged)]
enum CachedPage {
    Page(ProductPage),
    Items(Vec<Product>),
}

impl From<CachedPage> for ProductPage {
    fn from(cached: CachedPage) -> Self {
        match cached {
            CachedPage::Page(page) => page,
            CachedPage::Items(items) => {
                let total = items.len() as u64;
                ProductPage::new(items, total)
            }
        }
    }
}

/// Product service reading through a cache in front of the repository.
///
/// Writes go straight to the repository and leave cached entries alone, so
/// reads may be stale for up to one TTL after a create.
pub struct CachedProductService {
    repository: Arc<dyn ProductRepository>,
    cache: Arc<dyn CacheInterface>,
    settings: CacheSettings,
}

impl CachedProductService {
    /// Creates a new product service.
    pub fn new(
        repository: Arc<dyn ProductRepository>,
        cache: Arc<dyn CacheInterface>,
        settings: CacheSettings,
    ) -> Self {
        Self {
            repository,
            cache,
            settings,
        }
    }

    /// Reads a product from the cache, retrying backend errors.
    ///
    /// Any failure, including an undecodable entry, is a miss.
    async fn cached_product(&self, key: &str) -> Option<Product> {
        let read = self
            .settings
            .read_retry
            .execute(|| self.cache.get_raw(key))
            .await;

        let raw = match read {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(cache_key = key, "Product not cached");
                return None;
            }
            Err(e) => {
                warn!(cache_key = key, error = %e, "Cache read failed, falling back to store");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(product) => Some(product),
            Err(e) => {
                warn!(cache_key = key, error = %e, "Discarding undecodable cache entry");
                None
            }
        }
    }

    /// Reads a product page from the cache with a single attempt.
    async fn cached_page(&self, key: &str) -> Option<ProductPage> {
        let raw = match self.cache.get_raw(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(cache_key = key, "Product list not cached");
                return None;
            }
            Err(e) => {
                warn!(cache_key = key, error = %e, "Cache read failed, falling back to store");
                return None;
            }
        };

        match serde_json::from_str::<CachedPage>(&raw) {
            Ok(cached) => Some(cached.into()),
            Err(e) => {
                warn!(cache_key = key, error = %e, "Discarding undecodable cache entry");
                None
            }
        }
    }

    /// Writes `value` under `key` in a detached task.
    ///
    /// The caller never waits for the write and never sees its outcome.
    fn populate<T: Serialize>(&self, key: String, value: &T) {
        if !self.cache.is_enabled() {
            return;
        }

        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(cache_key = %key, error = %e, "Failed to encode cache entry");
                return;
            }
        };

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            debug!(cache_key = %key, "No runtime available, skipping cache write");
            return;
        };

        let cache = Arc::clone(&self.cache);
        let ttl = self.settings.ttl;
        runtime.spawn(async move {
            match cache.set_raw(&key, &payload, ttl).await {
                Ok(()) => debug!(cache_key = %key, "Cache populated"),
                Err(e) => warn!(cache_key = %key, error = %e, "Cache write failed"),
            }
        });
    }
}

#[async_trait]
impl ProductService for CachedProductService {
    async fn create_product(&self, new_product: NewProduct) -> PantryResult<Product> {
        debug!(name = %new_product.name, category = %new_product.category, "Creating product");

        if self
            .repository
            .find_by_name_and_category(&new_product.name, new_product.category)
            .await?
            .is_some()
        {
            return Err(PantryError::duplicate_product(
                &new_product.name,
                new_product.category,
            ));
        }

        let product = Product::new(new_product);
        self.repository.save(&product).await?;

        info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    async fn list_products(&self, filter: &ListFilter) -> PantryResult<ProductPage> {
        let key = cache_keys::product_list(filter);
        debug!(cache_key = %key, page = filter.page, page_size = filter.page_size, "Listing products");

        if let Some(page) = self.cached_page(&key).await {
            debug!(cache_key = %key, "Product list served from cache");
            return Ok(page);
        }

        let page = self.repository.find(filter).await?;
        self.populate(key, &page);
        Ok(page)
    }

    async fn get_product(&self, id: ProductId) -> PantryResult<Product> {
        let key = cache_keys::product_by_id(id);
        debug!(product_id = %id, "Getting product");

        if let Some(product) = self.cached_product(&key).await {
            debug!(product_id = %id, "Product served from cache");
            return Ok(product);
        }

        let product = self.repository.find_by_id(id).await?;
        self.populate(key, &product);
        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use pantry_core::ProductCategory;
    use pantry_repository::MockProductRepository;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    /// In-memory cache that can be told to fail reads and writes.
    #[derive(Default)]
    struct FakeCache {
        entries: Mutex<HashMap<String, String>>,
        failing_reads: AtomicU32,
        fail_everything: bool,
        gets: AtomicU32,
        sets: AtomicU32,
    }

    impl FakeCache {
        fn broken() -> Self {
            Self {
                fail_everything: true,
                ..Default::default()
            }
        }

        fn failing_first_reads(n: u32) -> Self {
            let cache = Self::default();
            cache.failing_reads.store(n, Ordering::SeqCst);
            cache
        }

        fn insert(&self, key: &str, value: &str) {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
        }

        fn entry(&self, key: &str) -> Option<String> {
            self.entries.lock().unwrap().get(key).cloned()
        }

        fn gets(&self) -> u32 {
            self.gets.load(Ordering::SeqCst)
        }

        fn sets(&self) -> u32 {
            self.sets.load(Ordering::SeqCst)
        }

        async fn wait_for_sets(&self, n: u32) {
            tokio::time::timeout(Duration::from_secs(2), async {
                while self.sets() < n {
                    tokio::time::sleep(Duration::from_millis(5)).await;
                }
            })
            .await
            .expect("cache was never populated");
        }
    }

    #[async_trait]
    impl CacheInterface for FakeCache {
        async fn get_raw(&self, key: &str) -> PantryResult<Option<String>> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            if self.fail_everything {
                return Err(PantryError::cache("connection refused"));
            }
            let remaining = self.failing_reads.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failing_reads.store(remaining - 1, Ordering::SeqCst);
                return Err(PantryError::cache("transient"));
            }
            Ok(self.entry(key))
        }

        async fn set_raw(&self, key: &str, value: &str, _ttl: Duration) -> PantryResult<()> {
            if self.fail_everything {
                self.sets.fetch_add(1, Ordering::SeqCst);
                return Err(PantryError::cache("connection refused"));
            }
            self.insert(key, value);
            self.sets.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn is_enabled(&self) -> bool {
            true
        }
    }

    fn settings() -> CacheSettings {
        CacheSettings {
            ttl: DEFAULT_TTL,
            read_retry: RetryPolicy::exponential(3, Duration::from_millis(1)),
        }
    }

    fn service(repository: MockProductRepository, cache: Arc<FakeCache>) -> CachedProductService {
        CachedProductService::new(Arc::new(repository), cache, settings())
    }

    fn banana() -> Product {
        Product::new(NewProduct::new("Banana", ProductCategory::Buah, 12000.0))
    }

    #[tokio::test]
    async fn test_get_hit_skips_store() {
        let product = banana();
        let cache = Arc::new(FakeCache::default());
        cache.insert(
            &cache_keys::product_by_id(product.id),
            &serde_json::to_string(&product).unwrap(),
        );

        let mut repository = MockProductRepository::new();
        repository.expect_find_by_id().never();

        let found = service(repository, cache.clone())
            .get_product(product.id)
            .await
            .unwrap();

        assert_eq!(found, product);
        assert_eq!(cache.sets(), 0);
    }

    #[tokio::test]
    async fn test_get_miss_queries_store_once_and_populates() {
        let product = banana();
        let cache = Arc::new(FakeCache::default());

        let mut repository = MockProductRepository::new();
        let stored = product.clone();
        repository
            .expect_find_by_id()
            .with(eq(product.id))
            .times(1)
            .returning(move |_| Ok(stored.clone()));

        let found = service(repository, cache.clone())
            .get_product(product.id)
            .await
            .unwrap();
        assert_eq!(found, product);

        cache.wait_for_sets(1).await;
        let raw = cache.entry(&cache_keys::product_by_id(product.id)).unwrap();
        assert_eq!(serde_json::from_str::<Product>(&raw).unwrap(), product);
    }

    #[tokio::test]
    async fn test_get_is_identical_on_miss_and_hit() {
        let product = banana();
        let cache = Arc::new(FakeCache::default());

        let mut repository = MockProductRepository::new();
        let stored = product.clone();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(stored.clone()));

        let service = service(repository, cache.clone());
        let first = service.get_product(product.id).await.unwrap();
        cache.wait_for_sets(1).await;
        let second = service.get_product(product.id).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.price.to_bits(), second.price.to_bits());
    }

    #[tokio::test]
    async fn test_get_not_found_propagates_without_cache_write() {
        let id = ProductId::new();
        let cache = Arc::new(FakeCache::default());

        let mut repository = MockProductRepository::new();
        repository
            .expect_find_by_id()
            .returning(|id| Err(PantryError::not_found("Product", id)));

        let err = service(repository, cache.clone())
            .get_product(id)
            .await
            .unwrap_err();

        assert!(matches!(err, PantryError::NotFound { .. }));
        tokio::task::yield_now().await;
        assert_eq!(cache.sets(), 0);
    }

    #[tokio::test]
    async fn test_get_store_error_propagates() {
        let mut repository = MockProductRepository::new();
        repository
            .expect_find_by_id()
            .returning(|_| Err(PantryError::Database("connection reset".to_string())));

        let err = service(repository, Arc::new(FakeCache::default()))
            .get_product(ProductId::new())
            .await
            .unwrap_err();

        assert!(matches!(err, PantryError::Database(_)));
    }

    #[tokio::test]
    async fn test_get_retries_transient_cache_errors() {
        let product = banana();
        let cache = Arc::new(FakeCache::failing_first_reads(2));
        cache.insert(
            &cache_keys::product_by_id(product.id),
            &serde_json::to_string(&product).unwrap(),
        );

        let mut repository = MockProductRepository::new();
        repository.expect_find_by_id().never();

        let found = service(repository, cache.clone())
            .get_product(product.id)
            .await
            .unwrap();

        assert_eq!(found, product);
        assert_eq!(cache.gets(), 3);
    }

    #[tokio::test]
    async fn test_get_miss_is_not_retried() {
        let product = banana();
        let cache = Arc::new(FakeCache::default());

        let mut repository = MockProductRepository::new();
        let stored = product.clone();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(stored.clone()));

        service(repository, cache.clone())
            .get_product(product.id)
            .await
            .unwrap();

        assert_eq!(cache.gets(), 1);
    }

    #[tokio::test]
    async fn test_get_falls_back_on_undecodable_entry() {
        let product = banana();
        let key = cache_keys::product_by_id(product.id);
        let cache = Arc::new(FakeCache::default());
        cache.insert(&key, "{not json");

        let mut repository = MockProductRepository::new();
        let stored = product.clone();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(stored.clone()));

        let found = service(repository, cache.clone())
            .get_product(product.id)
            .await
            .unwrap();
        assert_eq!(found, product);

        cache.wait_for_sets(1).await;
        let raw = cache.entry(&key).unwrap();
        assert_eq!(serde_json::from_str::<Product>(&raw).unwrap(), product);
    }

    #[tokio::test]
    async fn test_list_miss_returns_store_page_and_true_total() {
        let product = banana();
        let filter = ListFilter::default();
        let cache = Arc::new(FakeCache::default());

        let mut repository = MockProductRepository::new();
        let page = ProductPage::new(vec![product.clone()], 1);
        repository
            .expect_find()
            .times(1)
            .returning(move |_| Ok(page.clone()));

        let result = service(repository, cache.clone())
            .list_products(&filter)
            .await
            .unwrap();

        assert_eq!(result.items, vec![product.clone()]);
        assert_eq!(result.total, 1);

        cache.wait_for_sets(1).await;
        let raw = cache.entry(&cache_keys::product_list(&filter)).unwrap();
        let cached: ProductPage = serde_json::from_str(&raw).unwrap();
        assert_eq!(cached, result);
    }

    #[tokio::test]
    async fn test_list_hit_reports_cached_total() {
        let product = banana();
        let filter = ListFilter::default();
        let cache = Arc::new(FakeCache::default());
        cache.insert(
            &cache_keys::product_list(&filter),
            &serde_json::to_string(&ProductPage::new(vec![product.clone()], 7)).unwrap(),
        );

        let mut repository = MockProductRepository::new();
        repository.expect_find().never();

        let result = service(repository, cache)
            .list_products(&filter)
            .await
            .unwrap();

        assert_eq!(result.items, vec![product]);
        assert_eq!(result.total, 7);
    }

    #[tokio::test]
    async fn test_list_hit_on_bare_array_reports_page_length() {
        let product = banana();
        let filter = ListFilter::default();
        let cache = Arc::new(FakeCache::default());
        cache.insert(
            &cache_keys::product_list(&filter),
            &serde_json::to_string(&vec![product.clone()]).unwrap(),
        );

        let mut repository = MockProductRepository::new();
        repository.expect_find().never();

        let result = service(repository, cache)
            .list_products(&filter)
            .await
            .unwrap();

        assert_eq!(result.items, vec![product]);
        assert_eq!(result.total, 1);
    }

    #[tokio::test]
    async fn test_list_reads_cache_once() {
        let cache = Arc::new(FakeCache::failing_first_reads(1));

        let mut repository = MockProductRepository::new();
        repository
            .expect_find()
            .times(1)
            .returning(|_| Ok(ProductPage::empty()));

        let result = service(repository, cache.clone())
            .list_products(&ListFilter::default())
            .await
            .unwrap();

        assert!(result.items.is_empty());
        assert_eq!(cache.gets(), 1);
    }

    #[tokio::test]
    async fn test_list_store_error_propagates() {
        let mut repository = MockProductRepository::new();
        repository
            .expect_find()
            .returning(|_| Err(PantryError::Database("query failed".to_string())));

        let err = service(repository, Arc::new(FakeCache::default()))
            .list_products(&ListFilter::default())
            .await
            .unwrap_err();

        assert!(matches!(err, PantryError::Database(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate() {
        let existing = banana();

        let mut repository = MockProductRepository::new();
        repository
            .expect_find_by_name_and_category()
            .withf(|name, category| name.to_string() == "Banana" && *category == ProductCategory::Buah)
            .returning(move |_, _| Ok(Some(existing.clone())));
        repository.expect_save().never();

        let err = service(repository, Arc::new(FakeCache::default()))
            .create_product(NewProduct::new("Banana", ProductCategory::Buah, 9000.0))
            .await
            .unwrap_err();

        assert!(matches!(err, PantryError::Conflict(_)));
        assert!(err.to_string().contains("Banana"));
    }

    #[tokio::test]
    async fn test_create_saves_and_leaves_cache_alone() {
        let cache = Arc::new(FakeCache::default());

        let mut repository = MockProductRepository::new();
        repository
            .expect_find_by_name_and_category()
            .returning(|_, _| Ok(None));
        repository
            .expect_save()
            .withf(|p| p.name == "Tomato" && p.category == ProductCategory::Sayuran)
            .times(1)
            .returning(|_| Ok(()));

        let product = service(repository, cache.clone())
            .create_product(NewProduct::new("Tomato", ProductCategory::Sayuran, 5000.0))
            .await
            .unwrap();

        assert_eq!(product.name, "Tomato");
        assert!((product.price - 5000.0).abs() < f64::EPSILON);
        tokio::task::yield_now().await;
        assert_eq!(cache.gets(), 0);
        assert_eq!(cache.sets(), 0);
    }

    #[tokio::test]
    async fn test_create_propagates_store_conflict() {
        let mut repository = MockProductRepository::new();
        repository
            .expect_find_by_name_and_category()
            .returning(|_, _| Ok(None));
        repository
            .expect_save()
            .returning(|p| Err(PantryError::duplicate_product(&p.name, p.category)));

        let err = service(repository, Arc::new(FakeCache::default()))
            .create_product(NewProduct::new("Banana", ProductCategory::Buah, 1.0))
            .await
            .unwrap_err();

        assert!(matches!(err, PantryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_unavailable_cache_degrades_to_store() {
        let product = banana();
        let cache = Arc::new(FakeCache::broken());

        let mut repository = MockProductRepository::new();
        let stored = product.clone();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(stored.clone()));
        let listed = product.clone();
        repository
            .expect_find()
            .times(1)
            .returning(move |_| Ok(ProductPage::new(vec![listed.clone()], 1)));
        repository
            .expect_find_by_name_and_category()
            .returning(|_, _| Ok(None));
        repository.expect_save().returning(|_| Ok(()));

        let service = service(repository, cache.clone());

        assert_eq!(service.get_product(product.id).await.unwrap(), product);
        assert_eq!(cache.gets(), 3);

        let page = service.list_products(&ListFilter::default()).await.unwrap();
        assert_eq!(page.total, 1);

        service
            .create_product(NewProduct::new("Apple", ProductCategory::Buah, 8000.0))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_disabled_cache_never_populates() {
        let product = banana();

        let mut repository = MockProductRepository::new();
        let stored = product.clone();
        repository
            .expect_find_by_id()
            .times(2)
            .returning(move |_| Ok(stored.clone()));

        let service = CachedProductService::new(
            Arc::new(repository),
            Arc::new(crate::cache::RedisCacheService::disabled()),
            settings(),
        );

        service.get_product(product.id).await.unwrap();
        service.get_product(product.id).await.unwrap();
    }

    #[test]
    fn test_settings_from_config() {
        let config = CacheConfig {
            ttl_secs: 60,
            read_attempts: 5,
            retry_initial_delay_ms: 20,
        };
        let settings = CacheSettings::from_config(&config);
        assert_eq!(settings.ttl, Duration::from_secs(60));
        assert_eq!(settings.read_retry.max_attempts, 5);
        assert_eq!(settings.read_retry.initial_delay, Duration::from_millis(20));
        assert_eq!(settings.read_retry.delay_for_attempt(2), Duration::from_millis(40));
    }
}
