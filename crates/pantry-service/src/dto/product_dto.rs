//! Product-related DTOs.

use pantry_core::validation::rules::{positive_price, valid_category};
use pantry_core::{
    ListFilter, NewProduct, PageRequest, PantryError, PantryResult, ProductCategory, SortField,
    SortOrder, ValidateExt,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Adapter: `validator` passes `Copy` fields by value.
fn positive_price_by_value(value: f64) -> Result<(), validator::ValidationError> {
    positive_price(&value)
}

/// Request to create a new product.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 3, message = "name must be at least 3 characters"))]
    #[schema(example = "Banana")]
    pub name: String,

    /// One of `Sayuran`, `Protein`, `Buah`, `Snack`.
    #[serde(rename = "type")]
    #[validate(custom(function = "valid_category"))]
    #[schema(example = "Buah")]
    pub category: String,

    #[validate(custom(function = "positive_price_by_value"))]
    #[schema(example = 12000.0)]
    pub price: f64,
}

impl CreateProductRequest {
    /// Validates the request and converts it into a create payload.
    pub fn into_new_product(self) -> PantryResult<NewProduct> {
        self.validate_request()?;

        let category: ProductCategory = self
            .category
            .parse()
            .map_err(|e: pantry_core::UnknownCategory| PantryError::validation(e.to_string()))?;

        Ok(NewProduct::new(self.name, category, self.price))
    }
}

/// Query parameters accepted by the product listing endpoints.
///
/// Every field is optional; missing values take the listing defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListProductsQuery {
    /// Case-insensitive substring of the product name.
    pub name: Option<String>,
    /// Exact product type.
    #[serde(rename = "type")]
    pub category: Option<String>,
    /// `name`, `price` or `created_at` (default).
    pub sort_by: Option<String>,
    /// `asc` or `desc` (default).
    pub order: Option<String>,
    /// 1-indexed page number.
    pub page: Option<i64>,
    /// Page size.
    pub limit: Option<i64>,
}

impl ListProductsQuery {
    /// Normalizes the parameters into a list filter.
    ///
    /// `page` and `limit` below 1 are rejected; `limit` is capped at
    /// [`PageRequest::MAX_SIZE`].
    pub fn into_filter(self) -> PantryResult<ListFilter> {
        let page = positive_param("page", self.page, 1)?;
        let page_size = positive_param("limit", self.limit, i64::from(PageRequest::DEFAULT_SIZE))?
            .min(PageRequest::MAX_SIZE);

        let category = match self.category.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<ProductCategory>()
                    .map_err(|e| PantryError::validation(e.to_string()))?,
            ),
        };

        Ok(ListFilter {
            query: self.name.map(|q| q.trim().to_string()).unwrap_or_default(),
            category,
            sort_by: self
                .sort_by
                .as_deref()
                .map_or_else(SortField::default, SortField::parse_lenient),
            order: self
                .order
                .as_deref()
                .map_or_else(SortOrder::default, SortOrder::parse_lenient),
            page,
            page_size,
        })
    }
}

fn positive_param(name: &str, value: Option<i64>, default: i64) -> PantryResult<u32> {
    let value = value.unwrap_or(default);
    if value < 1 {
        return Err(PantryError::validation(format!("{name} must be at least 1")));
    }
    Ok(u32::try_from(value).unwrap_or(u32::MAX))
}
