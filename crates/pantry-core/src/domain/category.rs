//! Product category value object.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed set of categories a product may belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum ProductCategory {
    /// Vegetables.
    Sayuran,
    /// Meat, fish, eggs and other protein sources.
    Protein,
    /// Fruit.
    Buah,
    /// Snacks.
    Snack,
}

impl ProductCategory {
    /// Returns the canonical spelling used on the wire and in the store.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sayuran => "Sayuran",
            Self::Protein => "Protein",
            Self::Buah => "Buah",
            Self::Snack => "Snack",
        }
    }

    /// All possible categories.
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::Sayuran, Self::Protein, Self::Buah, Self::Snack]
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown product category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for ProductCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}
