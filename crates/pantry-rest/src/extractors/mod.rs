//! Custom Axum extractors.

mod list_params;
mod validated;

pub use list_params::*;
pub use validated::*;
