//! Allow-list and range checks applied to every user value before it is
//! turned into a device command.

use crate::error::ValidationError;

/// Accepts `value` iff `min <= value <= max`.
pub fn validate_range(
    field: &'static str,
    min: u64,
    max: u64,
    value: u64,
) -> Result<u64, ValidationError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

/// Case-insensitive membership test. Returns the canonical spelling from
/// `allowed`, which is what goes on the wire.
pub fn validate_enum<'a>(
    field: &'static str,
    allowed: &[&'a str],
    value: &str,
) -> Result<&'a str, ValidationError> {
    allowed
        .iter()
        .find(|a| a.eq_ignore_ascii_case(value))
        .copied()
        .ok_or_else(|| ValidationError::NotInSet {
            field,
            value: value.to_string(),
            allowed: allowed.join(", "),
        })
}

pub fn require<T>(field: &'static str, value: Option<T>) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::Missing(field))
}

/// `require` followed by `validate_range`.
pub fn require_range(
    field: &'static str,
    min: u64,
    max: u64,
    value: Option<u64>,
) -> Result<u64, ValidationError> {
    validate_range(field, min, max, require(field, value)?)
}
