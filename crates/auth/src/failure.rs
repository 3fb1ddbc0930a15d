//! Auth provider failure shape.

use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error-code discriminants reported by the auth provider.
///
/// Parsing never fails: unrecognized strings land in [`AuthErrorCode::Other`] and are
/// handled by the mapper's default arm.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AuthErrorCode {
    InvalidCredentials,
    InvalidGrant,
    UserAlreadyExists,
    EmailExists,
    PhoneExists,
    WeakPassword,
    EmailNotConfirmed,
    PhoneNotConfirmed,
    SessionExpired,
    SessionNotFound,
    RefreshTokenNotFound,
    RefreshTokenAlreadyUsed,
    BadJwt,
    NoAuthorization,
    UserNotFound,
    OtpExpired,
    SignupDisabled,
    UserBanned,
    OverRequestRateLimit,
    OverEmailSendRateLimit,
    OverSmsSendRateLimit,
    Other(String),
}

impl AuthErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            AuthErrorCode::InvalidCredentials => "invalid_credentials",
            AuthErrorCode::InvalidGrant => "invalid_grant",
            AuthErrorCode::UserAlreadyExists => "user_already_exists",
            AuthErrorCode::EmailExists => "email_exists",
            AuthErrorCode::PhoneExists => "phone_exists",
            AuthErrorCode::WeakPassword => "weak_password",
            AuthErrorCode::EmailNotConfirmed => "email_not_confirmed",
            AuthErrorCode::PhoneNotConfirmed => "phone_not_confirmed",
            AuthErrorCode::SessionExpired => "session_expired",
            AuthErrorCode::SessionNotFound => "session_not_found",
            AuthErrorCode::RefreshTokenNotFound => "refresh_token_not_found",
            AuthErrorCode::RefreshTokenAlreadyUsed => "refresh_token_already_used",
            AuthErrorCode::BadJwt => "bad_jwt",
            AuthErrorCode::NoAuthorization => "no_authorization",
            AuthErrorCode::UserNotFound => "user_not_found",
            AuthErrorCode::OtpExpired => "otp_expired",
            AuthErrorCode::SignupDisabled => "signup_disabled",
            AuthErrorCode::UserBanned => "user_banned",
            AuthErrorCode::OverRequestRateLimit => "over_request_rate_limit",
            AuthErrorCode::OverEmailSendRateLimit => "over_email_send_rate_limit",
            AuthErrorCode::OverSmsSendRateLimit => "over_sms_send_rate_limit",
            AuthErrorCode::Other(code) => code,
        }
    }
}

impl From<&str> for AuthErrorCode {
    fn from(code: &str) -> Self {
        match code {
            "invalid_credentials" => AuthErrorCode::InvalidCredentials,
            "invalid_grant" => AuthErrorCode::InvalidGrant,
            "user_already_exists" => AuthErrorCode::UserAlreadyExists,
            "email_exists" => AuthErrorCode::EmailExists,
            "phone_exists" => AuthErrorCode::PhoneExists,
            "weak_password" => AuthErrorCode::WeakPassword,
            "email_not_confirmed" => AuthErrorCode::EmailNotConfirmed,
            "phone_not_confirmed" => AuthErrorCode::PhoneNotConfirmed,
            "session_expired" => AuthErrorCode::SessionExpired,
            "session_not_found" => AuthErrorCode::SessionNotFound,
            "refresh_token_not_found" => AuthErrorCode::RefreshTokenNotFound,
            "refresh_token_already_used" => AuthErrorCode::RefreshTokenAlreadyUsed,
            "bad_jwt" => AuthErrorCode::BadJwt,
            "no_authorization" => AuthErrorCode::NoAuthorization,
            "user_not_found" => AuthErrorCode::UserNotFound,
            "otp_expired" => AuthErrorCode::OtpExpired,
            "signup_disabled" => AuthErrorCode::SignupDisabled,
            "user_banned" => AuthErrorCode::UserBanned,
            "over_request_rate_limit" => AuthErrorCode::OverRequestRateLimit,
            "over_email_send_rate_limit" => AuthErrorCode::OverEmailSendRateLimit,
            "over_sms_send_rate_limit" => AuthErrorCode::OverSmsSendRateLimit,
            other => AuthErrorCode::Other(other.to_string()),
        }
    }
}

impl From<String> for AuthErrorCode {
    fn from(code: String) -> Self {
        AuthErrorCode::from(code.as_str())
    }
}

impl From<AuthErrorCode> for String {
    fn from(code: AuthErrorCode) -> Self {
        code.as_str().to_string()
    }
}

impl fmt::Display for AuthErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure reported by the authentication service.
///
/// Mirrors what the provider's error payload carries: an HTTP status, an optional
/// machine-readable code, and a free-text message that must never be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("auth failure (status {status:?}, code {code:?}): {message}")]
pub struct AuthFailure {
    pub status: Option<u16>,
    pub code: Option<AuthErrorCode>,
    pub message: String,
    /// Seconds until the provider accepts requests again, when it says so.
    #[serde(default)]
    pub retry_after_secs: Option<u64>,
    /// Minimum password length reported alongside `weak_password`.
    #[serde(default)]
    pub min_password_length: Option<u32>,
}

impl AuthFailure {
    pub fn new(code: impl Into<AuthErrorCode>, message: impl Into<String>) -> Self {
        Self {
            status: None,
            code: Some(code.into()),
            message: message.into(),
            retry_after_secs: None,
            min_password_length: None,
        }
    }

    /// A failure known only by its HTTP status.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            code: None,
            message: message.into(),
            retry_after_secs: None,
            min_password_length: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_retry_after(mut self, secs: u64) -> Self {
        self.retry_after_secs = Some(secs);
        self
    }

    pub fn with_min_password_length(mut self, len: u32) -> Self {
        self.min_password_length = Some(len);
        self
    }
}
