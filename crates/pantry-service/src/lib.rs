//! # Pantry Service
//!
//! Application services for the Pantry catalog. The product service reads
//! through a key/value cache in front of the store gateway and treats the
//! cache as strictly optional.

pub mod cache;
pub mod dto;
pub mod r#impl;
pub mod product_service;

pub use cache::*;
pub use dto::*;
pub use product_service::*;
pub use r#impl::*;
