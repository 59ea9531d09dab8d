use thiserror::Error;

use crate::models::Field;

/// A field value that did not parse to a finite number greater than zero.
///
/// The `Display` text is the message shown next to the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Please enter a valid {}.", .field.label())]
pub struct ValidationError {
    pub field: Field,
}

/// Checks a parsed field value.
///
/// `None` stands for text that did not parse. The same rule applies to every
/// field; in particular the payment count is not required to be integral.
pub fn validate_field(
    value: Option<f64>,
    field: Field,
) -> Result<f64, ValidationError> {
    match value {
        Some(v) if v > 0.0 => Ok(v),
        _ => Err(ValidationError { field }),
    }
}
