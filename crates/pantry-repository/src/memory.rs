//! In-memory product repository.
//!
//! Mirrors the PostgreSQL semantics (case-insensitive uniqueness, filtering,
//! ordering, pagination) without a database. Used for local runs and tests.

use crate::traits::ProductRepository;
use async_trait::async_trait;
use pantry_core::{
    ListFilter, PantryError, PantryResult, Product, ProductCategory, ProductId, ProductPage,
    SortField, SortOrder,
};
use std::cmp::Ordering;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Product repository backed by a `Vec` behind a mutex.
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    products: Mutex<Vec<Product>>,
}

impl InMemoryProductRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-populated with `products`.
    #[must_use]
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: Mutex::new(products),
        }
    }

    fn products(&self) -> MutexGuard<'_, Vec<Product>> {
        self.products.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn same_identity(product: &Product, name: &str, category: ProductCategory) -> bool {
    product.category == category && product.name.to_lowercase() == name.to_lowercase()
}

fn compare(a: &Product, b: &Product, sort_by: SortField) -> Ordering {
    let primary = match sort_by {
        SortField::Name => a.name.cmp(&b.name),
        SortField::Price => a.price.total_cmp(&b.price),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
    };
    primary.then_with(|| a.id.into_inner().cmp(&b.id.into_inner()))
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn save(&self, product: &Product) -> PantryResult<()> {
        let mut products = self.products();
        if products
            .iter()
            .any(|p| same_identity(p, &product.name, product.category))
        {
            return Err(PantryError::duplicate_product(&product.name, product.category));
        }
        products.push(product.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ProductId) -> PantryResult<Product> {
        self.products()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| PantryError::not_found("Product", id))
    }

    async fn find_by_name_and_category(
        &self,
        name: &str,
        category: ProductCategory,
    ) -> PantryResult<Option<Product>> {
        Ok(self
            .products()
            .iter()
            .find(|p| same_identity(p, name, category))
            .cloned())
    }

    async fn find(&self, filter: &ListFilter) -> PantryResult<ProductPage> {
        let needle = filter.query_text().map(str::to_lowercase);
        let mut matching: Vec<Product> = self
            .products()
            .iter()
            .filter(|p| {
                needle
                    .as_deref()
                    .map_or(true, |q| p.name.to_lowercase().contains(q))
            })
            .filter(|p| filter.category.map_or(true, |c| p.category == c))
            .cloned()
            .collect();

        matching.sort_by(|a, b| {
            let ordering = compare(a, b, filter.sort_by);
            match filter.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let page = filter.page_request();
        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
            .collect();

        Ok(ProductPage::new(items, total))
    }

    async fn count(&self) -> PantryResult<u64> {
        Ok(self.products().len() as u64)
    }
}
