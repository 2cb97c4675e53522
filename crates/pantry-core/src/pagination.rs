//! Pagination types for list operations.

use serde::{Deserialize, Serialize};

/// A request for a page of results.
///
/// Pages are 1-indexed. Both fields are expected to be at least 1; the
/// transport layer rejects anything smaller before a request reaches here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    /// The page number (1-indexed).
    pub page: u32,
    /// The number of items per page.
    pub size: u32,
}

impl PageRequest {
    /// The default page size.
    pub const DEFAULT_SIZE: u32 = 10;
    /// The maximum allowed page size.
    pub const MAX_SIZE: u32 = 100;

    /// Creates a new page request, capping the size at [`Self::MAX_SIZE`].
    #[must_use]
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size: size.min(Self::MAX_SIZE),
        }
    }

    /// Creates a page request for the first page with default size.
    #[must_use]
    pub fn first() -> Self {
        Self::new(1, Self::DEFAULT_SIZE)
    }

    /// Returns the offset for database queries: `(page - 1) * size`.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page.saturating_sub(1) as u64) * self.size as u64
    }

    /// Returns the limit for database queries.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.size as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// Pagination metadata returned alongside a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PageMeta {
    /// The current page number (1-indexed).
    pub page: u32,
    /// The number of items per page.
    pub page_size: u32,
    /// The total number of matching items across all pages.
    pub total: u64,
    /// The total number of pages.
    pub total_page: u64,
}

impl PageMeta {
    /// Creates page metadata, computing the page count from the total.
    #[must_use]
    pub fn new(page: u32, page_size: u32, total: u64) -> Self {
        let total_page = if page_size > 0 {
            total.div_ceil(u64::from(page_size))
        } else {
            0
        };

        Self {
            page,
            page_size,
            total,
            total_page,
        }
    }
}
