//! Business-rule error model and its mapper.

use thiserror::Error;

use crate::code::{ErrorCode, ErrorFamily};
use crate::mapper::{unmapped, DomainMapper};
use crate::value::ErrorValue;

/// Business-level failure raised by application code.
///
/// Keep this focused on deterministic business failures (invariants, conflicts,
/// limits). Backend and transport failures have their own families.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation without a field-level rule.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A business invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was malformed.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("{entity} not found")]
    NotFound { entity: String },

    /// The operation conflicts with current state (e.g. already processed).
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A quota or limit was reached.
    #[error("limit of {limit} exceeded: {what}")]
    LimitExceeded { what: String, limit: u64 },

    /// Business failure without a dedicated code yet.
    #[error("{kind}: {message}")]
    Unspecified { kind: String, message: String },
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found(entity: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
        }
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }
}

/// Maps [`DomainError`] into `business_*` codes.
#[derive(Debug, Default, Clone, Copy)]
pub struct BusinessMapper;

#[deny(clippy::wildcard_enum_match_arm)]
impl DomainMapper<DomainError> for BusinessMapper {
    fn map(&self, failure: &DomainError) -> ErrorValue {
        let message = failure.to_string();
        match failure {
            DomainError::Validation(_) => ErrorValue::new(ErrorCode::ValidationGeneric, message),
            DomainError::InvalidId(_) => {
                ErrorValue::new(ErrorCode::ValidationInvalidFormat, message).with_param("expected", "id")
            }
            DomainError::InvariantViolation(_) => {
                ErrorValue::new(ErrorCode::BusinessRuleViolation, message)
            }
            DomainError::NotFound { entity } => {
                ErrorValue::new(ErrorCode::BusinessNotFound, message).with_param("entity", entity)
            }
            DomainError::Conflict(_) => ErrorValue::new(ErrorCode::BusinessConflict, message),
            DomainError::Forbidden(_) => ErrorValue::new(ErrorCode::BusinessForbidden, message),
            DomainError::LimitExceeded { limit, .. } => {
                ErrorValue::new(ErrorCode::BusinessLimitExceeded, message).with_param("limit", limit)
            }
            DomainError::Unspecified { kind, message } => {
                unmapped(ErrorFamily::Business, kind, message)
            }
        }
    }
}
