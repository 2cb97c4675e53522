//! Result type aliases for the catalog.

use crate::PantryError;

/// A specialized `Result` type for Pantry operations.
pub type PantryResult<T> = Result<T, PantryError>;
