//! PostgreSQL product repository implementation.

use crate::{traits::ProductRepository, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pantry_core::{
    ListFilter, PantryError, PantryResult, Product, ProductCategory, ProductId, ProductPage,
};
use sqlx::{FromRow, Postgres, QueryBuilder};
use std::sync::Arc;
use tracing::{debug, error};
use uuid::Uuid;

const SELECT_COLUMNS: &str = "SELECT id, name, category, price, created_at";

/// PostgreSQL product repository implementation.
#[derive(Clone)]
pub struct PostgresProductRepository {
    pool: Arc<dyn DatabasePoolInterface>,
}

impl PostgresProductRepository {
    /// Creates a new PostgreSQL product repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a product.
#[derive(Debug, FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    category: String,
    price: f64,
    created_at: DateTime<Utc>,
}

/// A product row carrying the window count of all matching rows.
#[derive(Debug, FromRow)]
struct ListedProductRow {
    #[sqlx(flatten)]
    product: ProductRow,
    total_count: i64,
}

impl TryFrom<ProductRow> for Product {
    type Error = PantryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let category = row
            .category
            .parse::<ProductCategory>()
            .map_err(|e| PantryError::Internal(format!("Invalid category in database: {e}")))?;

        Ok(Product {
            id: ProductId::from_uuid(row.id),
            name: row.name,
            category,
            price: row.price,
            created_at: row.created_at,
        })
    }
}

/// Escapes LIKE wildcards so the query text matches literally.
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Appends the WHERE clause for the filter's optional predicates.
fn push_predicates(builder: &mut QueryBuilder<'_, Postgres>, filter: &ListFilter) {
    let mut keyword = " WHERE ";

    if let Some(query) = filter.query_text() {
        builder
            .push(keyword)
            .push("LOWER(name) LIKE LOWER(")
            .push_bind(like_pattern(query))
            .push(")");
        keyword = " AND ";
    }

    if let Some(category) = filter.category {
        builder
            .push(keyword)
            .push("category = ")
            .push_bind(category.as_str());
    }
}

fn to_u64(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

impl PostgresProductRepository {
    async fn count_matching(&self, filter: &ListFilter) -> PantryResult<u64> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products");
        push_predicates(&mut builder, filter);

        let total: i64 = builder
            .build_query_scalar()
            .fetch_one(self.pool.inner())
            .await?;
        Ok(to_u64(total))
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn save(&self, product: &Product) -> PantryResult<()> {
        debug!(product_id = %product.id, "Inserting product");

        sqlx::query(
            r"
            INSERT INTO products (id, name, category, price, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(product.id.into_inner())
        .bind(&product.name)
        .bind(product.category.as_str())
        .bind(product.price)
        .bind(product.created_at)
        .execute(self.pool.inner())
        .await
        .map_err(|e| match PantryError::from(e) {
            PantryError::Conflict(_) => {
                PantryError::duplicate_product(&product.name, product.category)
            }
            other => {
                error!(product_id = %product.id, error = %other, "Error inserting product");
                other
            }
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: ProductId) -> PantryResult<Product> {
        debug!(product_id = %id, "Finding product by id");

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "{SELECT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        row.ok_or_else(|| PantryError::not_found("Product", id))?
            .try_into()
    }

    async fn find_by_name_and_category(
        &self,
        name: &str,
        category: ProductCategory,
    ) -> PantryResult<Option<Product>> {
        debug!(name, %category, "Finding product by name and category");

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "{SELECT_COLUMNS} FROM products \
             WHERE LOWER(name) = LOWER($1) AND LOWER(category) = LOWER($2) LIMIT 1"
        ))
        .bind(name)
        .bind(category.as_str())
        .fetch_optional(self.pool.inner())
        .await?;

        row.map(Product::try_from).transpose()
    }

    async fn find(&self, filter: &ListFilter) -> PantryResult<ProductPage> {
        debug!(
            query = %filter.query,
            category = ?filter.category,
            sort_by = %filter.sort_by,
            order = %filter.order,
            page = filter.page,
            page_size = filter.page_size,
            "Finding products"
        );

        let page = filter.page_request();
        let offset = i64::try_from(page.offset())
            .map_err(|_| PantryError::validation("page is out of range"))?;

        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "{SELECT_COLUMNS}, COUNT(*) OVER() AS total_count FROM products"
        ));
        push_predicates(&mut builder, filter);

        let column = filter.sort_by.column();
        let direction = filter.order.sql();
        builder.push(format!(" ORDER BY {column} {direction}, id {direction}"));
        builder.push(" LIMIT ");
        builder.push_bind(i64::from(page.size));
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        let rows: Vec<ListedProductRow> = builder
            .build_query_as()
            .fetch_all(self.pool.inner())
            .await?;

        let total = match rows.first() {
            Some(row) => to_u64(row.total_count),
            None if offset > 0 => self.count_matching(filter).await?,
            None => 0,
        };

        let items = rows
            .into_iter()
            .map(|row| Product::try_from(row.product))
            .collect::<PantryResult<Vec<_>>>()?;

        Ok(ProductPage::new(items, total))
    }

    async fn count(&self) -> PantryResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool.inner())
            .await?;
        Ok(to_u64(total))
    }
}
