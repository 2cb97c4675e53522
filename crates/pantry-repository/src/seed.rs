//! Sample catalog inserted into an empty store.

use crate::traits::ProductRepository;
use pantry_core::{NewProduct, PantryResult, Product, ProductCategory};
use tracing::info;

/// Products inserted by [`seed_products`].
#[must_use]
pub fn sample_products() -> Vec<NewProduct> {
    vec![
        NewProduct::new("Tomato", ProductCategory::Sayuran, 5000.0),
        NewProduct::new("Chicken Breast", ProductCategory::Protein, 25000.0),
        NewProduct::new("Apple", ProductCategory::Buah, 8000.0),
        NewProduct::new("Chips", ProductCategory::Snack, 6000.0),
    ]
}

/// Inserts the sample catalog when the store holds no products.
///
/// Returns the number of products inserted.
pub async fn seed_products(repository: &dyn ProductRepository) -> PantryResult<usize> {
    if repository.count().await? > 0 {
        info!("Product table already populated, skipping seed");
        return Ok(0);
    }

    let samples = sample_products();
    let inserted = samples.len();
    for new_product in samples {
        repository.save(&Product::new(new_product)).await?;
    }

    info!(inserted, "Seeded sample products");
    Ok(inserted)
}
