//! Validation of numeric and enumerated inputs.
//!
//! The normalizer stores everything as text; fields that carry numbers or a
//! closed set of values are checked here by the operations that write them.

use std::fmt;

/// Validation error types.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Value is not a number where one is required.
    NotANumber { field: String, value: String },
    /// Number outside its allowed range.
    OutOfRange { field: String, min: i64, max: i64, actual: i64 },
    /// Negative or non-finite amount.
    InvalidAmount(f64),
    /// Value outside a closed set.
    UnknownVariant { field: String, value: String },
    /// Empty value where one is required.
    Empty(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NotANumber { field, value } => {
                write!(f, "{} must be a whole number, got '{}'", field, value)
            }
            ValidationError::OutOfRange { field, min, max, actual } => {
                write!(f, "{} must be between {} and {}, got {}", field, min, max, actual)
            }
            ValidationError::InvalidAmount(amount) => {
                write!(f, "amount must be zero or positive, got {}", amount)
            }
            ValidationError::UnknownVariant { field, value } => {
                write!(f, "'{}' is not a valid {}", value, field)
            }
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Lowest distributor level.
pub const MIN_LEVEL: i64 = 1;

/// Highest distributor level.
pub const MAX_LEVEL: i64 = 13;

/// Parse a whole number, accepting a spreadsheet-style `"3.0"`.
pub fn parse_whole_number(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Ok(value) = text.parse::<i64>() {
        return Some(value);
    }
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 => Some(value as i64),
        _ => None,
    }
}

/// Validate a level entered by hand.
///
/// Blank input means "no level". Anything else must be a whole number in
/// `MIN_LEVEL..=MAX_LEVEL`.
pub fn parse_level(text: &str) -> Result<Option<i64>, ValidationError> {
    if text.trim().is_empty() {
        return Ok(None);
    }

    let level = parse_whole_number(text).ok_or_else(|| ValidationError::NotANumber {
        field: "level".to_string(),
        value: text.trim().to_string(),
    })?;

    if !(MIN_LEVEL..=MAX_LEVEL).contains(&level) {
        return Err(ValidationError::OutOfRange {
            field: "level".to_string(),
            min: MIN_LEVEL,
            max: MAX_LEVEL,
            actual: level,
        });
    }

    Ok(Some(level))
}

/// Validate an order quantity.
pub fn validate_quantity(qty: i64) -> Result<(), ValidationError> {
    if qty < 1 {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: i64::MAX,
            actual: qty,
        });
    }
    Ok(())
}

/// Validate an order amount.
pub fn validate_amount(amount: f64) -> Result<(), ValidationError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(ValidationError::InvalidAmount(amount));
    }
    Ok(())
}

/// Require a non-blank value.
pub fn validate_required(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty(field.to_string()));
    }
    Ok(())
}
