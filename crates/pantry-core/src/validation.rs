//! Validation utilities.

use crate::{FieldError, PantryError};
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `PantryError` on failure.
    fn validate_request(&self) -> Result<(), PantryError> {
        self.validate().map_err(validation_errors_to_pantry_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Flattens `validator::ValidationErrors` into field errors, sorted by field
/// name so messages are stable.
#[must_use]
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut field_errors: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: (*field).to_string(),
                message: error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string),
                code: error.code.to_string(),
            })
        })
        .collect();
    field_errors.sort_by(|a, b| a.field.cmp(&b.field));
    field_errors
}

/// Converts `validator::ValidationErrors` to `PantryError`.
#[must_use]
pub fn validation_errors_to_pantry_error(errors: ValidationErrors) -> PantryError {
    let message = field_errors(&errors)
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ");

    PantryError::Validation(message)
}

/// Common validation functions.
pub mod rules {
    use crate::ProductCategory;
    use validator::ValidationError;

    /// Validates that a string is exactly one of the product category names.
    ///
    /// Unlike `ProductCategory::from_str`, case and surrounding whitespace
    /// must match.
    pub fn valid_category(value: &str) -> Result<(), ValidationError> {
        if ProductCategory::all().iter().any(|c| c.as_str() == value) {
            return Ok(());
        }
        let mut error = ValidationError::new("invalid_category");
        error.message = Some("type must be one of Sayuran, Protein, Buah, Snack".into());
        Err(error)
    }

    /// Validates that a price is a finite positive number.
    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn positive_price(value: &f64) -> Result<(), ValidationError> {
        if !value.is_finite() || *value <= 0.0 {
            let mut error = ValidationError::new("positive_price");
            error.message = Some("price must be greater than 0".into());
            return Err(error);
        }
        Ok(())
    }
}
