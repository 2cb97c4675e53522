//! Cache key generators for consistent key naming.
//!
//! Keys are pure functions of their inputs. Every list filter field is
//! always written, in a fixed order, so default and explicit values never
//! collapse into the same key by omission.

use pantry_core::{ListFilter, ProductId};
use url::form_urlencoded::byte_serialize;

/// Generate a cache key for a product by ID.
#[must_use]
pub fn product_by_id(id: ProductId) -> String {
    format!("product:id:{id}")
}

/// Generate a cache key for one page of a product listing.
///
/// The key is built from the normalized filter: the query text is trimmed
/// the same way the store trims it, so `" x"` and `"x"` share a key. Free
/// text is form-urlencoded so it can never contain the `:` or `=`
/// separators.
#[must_use]
pub fn product_list(filter: &ListFilter) -> String {
    let query: String = byte_serialize(filter.query_text().unwrap_or_default().as_bytes()).collect();
    let category = filter.category.map(|c| c.as_str()).unwrap_or_default();

    format!(
        "product:list:q={query}:category={category}:sort={}:order={}:page={}:size={}",
        filter.sort_by, filter.order, filter.page, filter.page_size
    )
}
