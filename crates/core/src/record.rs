//! Structured failure record handed to logging sinks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::code::{ErrorCode, Severity};
use crate::value::ErrorValue;

/// What a logging collaborator receives for one mapped failure.
///
/// Carries the technical context verbatim and never the localized message, so logs
/// stay in one diagnostic language regardless of UI locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    /// Time-ordered identifier (UUIDv7), usable as a support reference.
    pub record_id: Uuid,
    /// Name of the boundary that mapped the failure (e.g. `profiles`).
    pub boundary: String,
    pub code: ErrorCode,
    pub severity: Severity,
    pub technical_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical_detail: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl FailureRecord {
    pub fn from_value(value: &ErrorValue, boundary: &str) -> Self {
        Self {
            record_id: Uuid::now_v7(),
            boundary: boundary.to_string(),
            code: value.code(),
            severity: value.severity(),
            technical_message: value.technical_message().to_string(),
            technical_detail: value.technical_detail().map(str::to_string),
            occurred_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_copies_technical_context_verbatim() {
        let value = ErrorValue::new(ErrorCode::DatabaseGeneric, "unmapped sqlstate")
            .with_detail("sqlstate=XX000 message=internal_error");
        let record = value.record("profiles");

        assert_eq!(record.boundary, "profiles");
        assert_eq!(record.code, ErrorCode::DatabaseGeneric);
        assert_eq!(record.severity, Severity::High);
        assert_eq!(record.technical_message, "unmapped sqlstate");
        assert_eq!(
            record.technical_detail.as_deref(),
            Some("sqlstate=XX000 message=internal_error")
        );
    }

    #[test]
    fn record_serializes_code_in_snake_case() {
        let record = ErrorValue::new(ErrorCode::AuthRateLimited, "429").record("auth");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["code"], "auth_rate_limited");
        assert_eq!(json["severity"], "medium");
        assert!(json.get("technical_detail").is_none());
    }
}
