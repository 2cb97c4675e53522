//! Repository trait definitions.

use async_trait::async_trait;
#[cfg(any(test, feature = "mock"))]
use mockall::automock;
use pantry_core::{
    Interface, ListFilter, PantryResult, Product, ProductCategory, ProductId, ProductPage,
};

/// Durable storage for products.
///
/// Implementations own no caching concerns.
#[cfg_attr(any(test, feature = "mock"), automock)]
#[async_trait]
pub trait ProductRepository: Interface + Send + Sync {
    /// Inserts a fully populated product.
    ///
    /// A duplicate (name, category) pair fails with `PantryError::Conflict`.
    async fn save(&self, product: &Product) -> PantryResult<()>;

    /// Finds a product by ID, failing with `PantryError::NotFound` when absent.
    async fn find_by_id(&self, id: ProductId) -> PantryResult<Product>;

    /// Finds a product by name and category, both compared case-insensitively.
    async fn find_by_name_and_category(
        &self,
        name: &str,
        category: ProductCategory,
    ) -> PantryResult<Option<Product>>;

    /// Returns one page of products matching the filter, together with the
    /// number of matches before pagination.
    async fn find(&self, filter: &ListFilter) -> PantryResult<ProductPage>;

    /// Counts all products.
    async fn count(&self) -> PantryResult<u64>;
}
