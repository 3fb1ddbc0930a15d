//! Local input validation failures and their mapper.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::code::{ErrorCode, ErrorFamily};
use crate::mapper::{unmapped, DomainMapper};
use crate::value::ErrorValue;

/// Which rule a field broke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ValidationRule {
    Required,
    TooShort { min_length: usize },
    TooLong { max_length: usize },
    InvalidEmail,
    InvalidFormat { expected: String },
    OutOfRange { min: i64, max: i64 },
    /// Must equal another field (e.g. password confirmation).
    Mismatch { other_field: String },
    /// Application-specific rule without a dedicated code.
    Custom { name: String, message: String },
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("validation failed for '{field}': {rule:?}")]
pub struct ValidationFailure {
    pub field: String,
    pub rule: ValidationRule,
}

impl ValidationFailure {
    pub fn new(field: impl Into<String>, rule: ValidationRule) -> Self {
        Self {
            field: field.into(),
            rule,
        }
    }
}

/// Maps [`ValidationFailure`] into `validation_*` codes.
#[derive(Debug, Default, Clone, Copy)]
pub struct ValidationMapper;

#[deny(clippy::wildcard_enum_match_arm)]
impl DomainMapper<ValidationFailure> for ValidationMapper {
    fn map(&self, failure: &ValidationFailure) -> ErrorValue {
        let field = failure.field.as_str();
        let value = match &failure.rule {
            ValidationRule::Required => {
                ErrorValue::new(ErrorCode::ValidationRequired, format!("{field} is required"))
            }
            ValidationRule::TooShort { min_length } => ErrorValue::new(
                ErrorCode::ValidationTooShort,
                format!("{field} shorter than {min_length}"),
            )
            .with_param("min_length", min_length),
            ValidationRule::TooLong { max_length } => ErrorValue::new(
                ErrorCode::ValidationTooLong,
                format!("{field} longer than {max_length}"),
            )
            .with_param("max_length", max_length),
            ValidationRule::InvalidEmail => ErrorValue::new(
                ErrorCode::ValidationInvalidEmail,
                format!("{field} is not an email address"),
            ),
            ValidationRule::InvalidFormat { expected } => ErrorValue::new(
                ErrorCode::ValidationInvalidFormat,
                format!("{field} does not match {expected}"),
            )
            .with_param("expected", expected),
            ValidationRule::OutOfRange { min, max } => ErrorValue::new(
                ErrorCode::ValidationOutOfRange,
                format!("{field} outside {min}..={max}"),
            )
            .with_params([("min", min), ("max", max)]),
            ValidationRule::Mismatch { other_field } => ErrorValue::new(
                ErrorCode::ValidationMismatch,
                format!("{field} does not match {other_field}"),
            )
            .with_param("other_field", other_field),
            ValidationRule::Custom { name, message } => {
                unmapped(ErrorFamily::Validation, name, message)
            }
        };
        value.with_param("field", field)
    }
}

/// Fail with `Required` when `value` is blank.
pub fn require(field: &str, value: &str) -> Result<(), ValidationFailure> {
    if value.trim().is_empty() {
        return Err(ValidationFailure::new(field, ValidationRule::Required));
    }
    Ok(())
}

/// Length is counted in characters, not bytes.
pub fn min_length(field: &str, value: &str, min: usize) -> Result<(), ValidationFailure> {
    if value.chars().count() < min {
        return Err(ValidationFailure::new(field, ValidationRule::TooShort { min_length: min }));
    }
    Ok(())
}

pub fn max_length(field: &str, value: &str, max: usize) -> Result<(), ValidationFailure> {
    if value.chars().count() > max {
        return Err(ValidationFailure::new(field, ValidationRule::TooLong { max_length: max }));
    }
    Ok(())
}

/// Structural check only: one `@`, non-empty local part, dotted domain.
pub fn email(field: &str, value: &str) -> Result<(), ValidationFailure> {
    let invalid = || ValidationFailure::new(field, ValidationRule::InvalidEmail);
    let (local, domain) = value.trim().split_once('@').ok_or_else(invalid)?;
    let domain_ok = !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.chars().any(char::is_whitespace);
    if local.is_empty() || local.chars().any(char::is_whitespace) || !domain_ok {
        return Err(invalid());
    }
    Ok(())
}

pub fn in_range(field: &str, value: i64, min: i64, max: i64) -> Result<(), ValidationFailure> {
    if value < min || value > max {
        return Err(ValidationFailure::new(field, ValidationRule::OutOfRange { min, max }));
    }
    Ok(())
}

pub fn matches(
    field: &str,
    value: &str,
    other_field: &str,
    other_value: &str,
) -> Result<(), ValidationFailure> {
    if value != other_value {
        return Err(ValidationFailure::new(
            field,
            ValidationRule::Mismatch {
                other_field: other_field.to_string(),
            },
        ));
    }
    Ok(())
}
