//! Error code registry.
//!
//! `ErrorCode` is the closed set of failure categories the rest of the system is
//! allowed to talk about. Every piece of metadata (localization key, retryability,
//! severity, family) is a pure function of the variant, so adding a category means
//! adding one variant here plus one template per locale.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How loudly a failure should be surfaced.
///
/// Metadata only: nothing in this workspace escalates based on severity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level grouping of error codes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorFamily {
    Database,
    Auth,
    Network,
    Validation,
    Business,
    Unknown,
}

impl ErrorFamily {
    /// The `*_generic` fallback for this family.
    pub fn generic_code(self) -> ErrorCode {
        match self {
            ErrorFamily::Database => ErrorCode::DatabaseGeneric,
            ErrorFamily::Auth => ErrorCode::AuthGeneric,
            ErrorFamily::Network => ErrorCode::NetworkGeneric,
            ErrorFamily::Validation => ErrorCode::ValidationGeneric,
            ErrorFamily::Business => ErrorCode::BusinessGeneric,
            ErrorFamily::Unknown => ErrorCode::UnknownError,
        }
    }
}

macro_rules! error_codes {
    ($( $variant:ident => $name:literal ),+ $(,)?) => {
        /// Closed registry of every failure category.
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum ErrorCode {
            $( $variant, )+
        }

        impl ErrorCode {
            /// Every variant, in declaration order.
            pub const ALL: &'static [ErrorCode] = &[ $( ErrorCode::$variant, )+ ];

            /// Stable snake_case name of the variant.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( ErrorCode::$variant => $name, )+
                }
            }
        }

        impl FromStr for ErrorCode {
            type Err = UnknownErrorCode;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $name => Ok(ErrorCode::$variant), )+
                    other => Err(UnknownErrorCode(other.to_string())),
                }
            }
        }
    };
}

error_codes! {
    DatabaseUniqueConstraint => "database_unique_constraint",
    DatabaseForeignKey => "database_foreign_key",
    DatabaseNotNull => "database_not_null",
    DatabaseCheckConstraint => "database_check_constraint",
    DatabasePermissionDenied => "database_permission_denied",
    DatabaseInvalidInput => "database_invalid_input",
    DatabaseNotFound => "database_not_found",
    DatabaseConflict => "database_conflict",
    DatabaseConnectionFailed => "database_connection_failed",
    DatabaseTimeout => "database_timeout",
    DatabaseGeneric => "database_generic",

    AuthInvalidCredentials => "auth_invalid_credentials",
    AuthUserExists => "auth_user_exists",
    AuthWeakPassword => "auth_weak_password",
    AuthEmailNotConfirmed => "auth_email_not_confirmed",
    AuthSessionExpired => "auth_session_expired",
    AuthInvalidToken => "auth_invalid_token",
    AuthUserNotFound => "auth_user_not_found",
    AuthOtpExpired => "auth_otp_expired",
    AuthSignupDisabled => "auth_signup_disabled",
    AuthUserBanned => "auth_user_banned",
    AuthRateLimited => "auth_rate_limited",
    AuthGeneric => "auth_generic",

    NetworkNoConnection => "network_no_connection",
    NetworkTimeout => "network_timeout",
    NetworkSecureConnectionFailed => "network_secure_connection_failed",
    NetworkServerError => "network_server_error",
    NetworkRateLimited => "network_rate_limited",
    NetworkNotFound => "network_not_found",
    NetworkRequestRejected => "network_request_rejected",
    NetworkBadResponse => "network_bad_response",
    NetworkGeneric => "network_generic",

    ValidationRequired => "validation_required",
    ValidationTooShort => "validation_too_short",
    ValidationTooLong => "validation_too_long",
    ValidationInvalidEmail => "validation_invalid_email",
    ValidationInvalidFormat => "validation_invalid_format",
    ValidationOutOfRange => "validation_out_of_range",
    ValidationMismatch => "validation_mismatch",
    ValidationGeneric => "validation_generic",

    BusinessNotFound => "business_not_found",
    BusinessConflict => "business_conflict",
    BusinessRuleViolation => "business_rule_violation",
    BusinessForbidden => "business_forbidden",
    BusinessLimitExceeded => "business_limit_exceeded",
    BusinessGeneric => "business_generic",

    UnknownError => "unknown_error",
}

/// Returned when parsing a name that is not in the registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown error code '{0}'")]
pub struct UnknownErrorCode(pub String);

impl ErrorCode {
    /// Key used to look up the user-facing template, e.g. `error.database_timeout`.
    pub fn localization_key(self) -> String {
        format!("error.{}", self.as_str())
    }

    /// Whether retrying the same operation unchanged can reasonably succeed.
    pub fn is_retryable(self) -> bool {
        use ErrorCode::*;
        match self {
            DatabaseConnectionFailed
            | DatabaseTimeout
            | DatabaseConflict
            | AuthRateLimited
            | NetworkNoConnection
            | NetworkTimeout
            | NetworkServerError
            | NetworkRateLimited => true,

            DatabaseUniqueConstraint
            | DatabaseForeignKey
            | DatabaseNotNull
            | DatabaseCheckConstraint
            | DatabasePermissionDenied
            | DatabaseInvalidInput
            | DatabaseNotFound
            | DatabaseGeneric
            | AuthInvalidCredentials
            | AuthUserExists
            | AuthWeakPassword
            | AuthEmailNotConfirmed
            | AuthSessionExpired
            | AuthInvalidToken
            | AuthUserNotFound
            | AuthOtpExpired
            | AuthSignupDisabled
            | AuthUserBanned
            | AuthGeneric
            | NetworkSecureConnectionFailed
            | NetworkNotFound
            | NetworkRequestRejected
            | NetworkBadResponse
            | NetworkGeneric
            | ValidationRequired
            | ValidationTooShort
            | ValidationTooLong
            | ValidationInvalidEmail
            | ValidationInvalidFormat
            | ValidationOutOfRange
            | ValidationMismatch
            | ValidationGeneric
            | BusinessNotFound
            | BusinessConflict
            | BusinessRuleViolation
            | BusinessForbidden
            | BusinessLimitExceeded
            | BusinessGeneric
            | UnknownError => false,
        }
    }

    pub fn severity(self) -> Severity {
        use ErrorCode::*;
        match self {
            ValidationRequired
            | ValidationTooShort
            | ValidationTooLong
            | ValidationInvalidEmail
            | ValidationInvalidFormat
            | ValidationOutOfRange
            | ValidationMismatch
            | ValidationGeneric
            | AuthInvalidCredentials
            | AuthWeakPassword
            | AuthUserExists
            | AuthEmailNotConfirmed
            | AuthOtpExpired
            | DatabaseUniqueConstraint
            | DatabaseNotNull
            | DatabaseInvalidInput
            | BusinessNotFound => Severity::Low,

            DatabaseForeignKey
            | DatabaseCheckConstraint
            | DatabaseNotFound
            | DatabaseConflict
            | AuthSessionExpired
            | AuthUserNotFound
            | AuthSignupDisabled
            | AuthRateLimited
            | NetworkNoConnection
            | NetworkTimeout
            | NetworkRateLimited
            | NetworkNotFound
            | NetworkRequestRejected
            | BusinessConflict
            | BusinessRuleViolation
            | BusinessLimitExceeded
            | BusinessGeneric => Severity::Medium,

            DatabasePermissionDenied
            | DatabaseTimeout
            | DatabaseGeneric
            | AuthInvalidToken
            | AuthUserBanned
            | AuthGeneric
            | NetworkServerError
            | NetworkBadResponse
            | NetworkGeneric
            | BusinessForbidden => Severity::High,

            DatabaseConnectionFailed | NetworkSecureConnectionFailed | UnknownError => {
                Severity::Critical
            }
        }
    }

    pub fn family(self) -> ErrorFamily {
        use ErrorCode::*;
        match self {
            DatabaseUniqueConstraint
            | DatabaseForeignKey
            | DatabaseNotNull
            | DatabaseCheckConstraint
            | DatabasePermissionDenied
            | DatabaseInvalidInput
            | DatabaseNotFound
            | DatabaseConflict
            | DatabaseConnectionFailed
            | DatabaseTimeout
            | DatabaseGeneric => ErrorFamily::Database,

            AuthInvalidCredentials
            | AuthUserExists
            | AuthWeakPassword
            | AuthEmailNotConfirmed
            | AuthSessionExpired
            | AuthInvalidToken
            | AuthUserNotFound
            | AuthOtpExpired
            | AuthSignupDisabled
            | AuthUserBanned
            | AuthRateLimited
            | AuthGeneric => ErrorFamily::Auth,

            NetworkNoConnection
            | NetworkTimeout
            | NetworkSecureConnectionFailed
            | NetworkServerError
            | NetworkRateLimited
            | NetworkNotFound
            | NetworkRequestRejected
            | NetworkBadResponse
            | NetworkGeneric => ErrorFamily::Network,

            ValidationRequired
            | ValidationTooShort
            | ValidationTooLong
            | ValidationInvalidEmail
            | ValidationInvalidFormat
            | ValidationOutOfRange
            | ValidationMismatch
            | ValidationGeneric => ErrorFamily::Validation,

            BusinessNotFound
            | BusinessConflict
            | BusinessRuleViolation
            | BusinessForbidden
            | BusinessLimitExceeded
            | BusinessGeneric => ErrorFamily::Business,

            UnknownError => ErrorFamily::Unknown,
        }
    }

    /// True for the `*_generic` fallbacks and `unknown_error`.
    pub fn is_fallback(self) -> bool {
        self.family().generic_code() == self
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
