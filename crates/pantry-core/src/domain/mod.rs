//! Catalog domain model.
//!
//! Products are created once and never mutated afterwards. Listing is driven
//! by a [`ListFilter`], an ephemeral query descriptor that is never persisted.

mod category;
mod filter;
mod product;

pub use category::*;
pub use filter::*;
pub use product::*;
