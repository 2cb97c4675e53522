//! List query descriptor.

use super::ProductCategory;
use crate::pagination::PageRequest;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column a product listing can be ordered by.
///
/// The set is closed so the store never interpolates a caller-provided
/// column name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Name,
    Price,
    #[default]
    CreatedAt,
}

impl SortField {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Price => "price",
            Self::CreatedAt => "created_at",
        }
    }

    /// The store column backing this field.
    #[must_use]
    pub const fn column(&self) -> &'static str {
        self.as_str()
    }

    /// Parses a sort field, falling back to `created_at` for anything unknown.
    #[must_use]
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Self::Name,
            "price" => Self::Price,
            _ => Self::CreatedAt,
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// SQL keyword for this direction.
    #[must_use]
    pub const fn sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    /// Only `asc` (any case) is ascending; everything else sorts descending.
    #[must_use]
    pub fn parse_lenient(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("asc") {
            Self::Asc
        } else {
            Self::Desc
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter, ordering and pagination for a product listing.
///
/// `page` and `page_size` are 1-based and must be at least 1; the HTTP layer
/// rejects smaller values before a filter is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListFilter {
    /// Case-insensitive substring matched against the product name.
    pub query: String,
    pub category: Option<ProductCategory>,
    pub sort_by: SortField,
    pub order: SortOrder,
    pub page: u32,
    pub page_size: u32,
}

impl Default for ListFilter {
    fn default() -> Self {
        Self {
            query: String::new(),
            category: None,
            sort_by: SortField::default(),
            order: SortOrder::default(),
            page: 1,
            page_size: PageRequest::DEFAULT_SIZE,
        }
    }
}

impl ListFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: ProductCategory) -> Self {
        self.category = Some(category);
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort_by: SortField, order: SortOrder) -> Self {
        self.sort_by = sort_by;
        self.order = order;
        self
    }

    #[must_use]
    pub fn with_page(mut self, page: u32, page_size: u32) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    /// Returns the pagination window for the store query.
    #[must_use]
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.page_size)
    }

    /// Returns the trimmed query text, or `None` when it is blank.
    #[must_use]
    pub fn query_text(&self) -> Option<&str> {
        let trimmed = self.query.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}
