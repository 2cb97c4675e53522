//! Product entity.

use super::ProductCategory;
use crate::id::ProductId;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// A catalog product.
///
/// Products are immutable once created. The timestamp is truncated to
/// microseconds so a value read back from the store compares equal to the
/// one that was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Product {
    /// Server-generated identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Product category.
    #[serde(rename = "type")]
    pub category: ProductCategory,
    /// Unit price.
    pub price: f64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Creates a product from a validated payload, assigning a fresh id and
    /// the current timestamp.
    #[must_use]
    pub fn new(new_product: NewProduct) -> Self {
        Self {
            id: ProductId::new(),
            name: new_product.name,
            category: new_product.category,
            price: new_product.price,
            created_at: Utc::now().trunc_subsecs(6),
        }
    }
}

/// A validated create payload.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub category: ProductCategory,
    pub price: f64,
}

impl NewProduct {
    #[must_use]
    pub fn new(name: impl Into<String>, category: ProductCategory, price: f64) -> Self {
        Self {
            name: name.into(),
            category,
            price,
        }
    }
}

/// One page of products together with the number of matching products
/// across all pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub total: u64,
}

impl ProductPage {
    #[must_use]
    pub fn new(items: Vec<Product>, total: u64) -> Self {
        Self { items, total }
    }

    /// Returns an empty page.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}
