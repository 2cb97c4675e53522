//! Product service trait definition.

use async_trait::async_trait;
#[cfg(any(test, feature = "mock"))]
use mockall::automock;
use pantry_core::{Interface, ListFilter, NewProduct, PantryResult, Product, ProductId, ProductPage};

/// Product service trait.
///
/// Cache failures never surface through this trait; store failures do.
#[cfg_attr(any(test, feature = "mock"), automock)]
#[async_trait]
pub trait ProductService: Interface + Send + Sync {
    /// Creates a new product, failing with `PantryError::Conflict` when one
    /// with the same name and category already exists.
    async fn create_product(&self, new_product: NewProduct) -> PantryResult<Product>;

    /// Lists one page of products matching the filter.
    async fn list_products(&self, filter: &ListFilter) -> PantryResult<ProductPage>;

    /// Gets a product by ID.
    async fn get_product(&self, id: ProductId) -> PantryResult<Product>;
}
