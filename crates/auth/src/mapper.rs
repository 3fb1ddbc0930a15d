//! Auth failure mapper.
//!
//! | provider discriminant | code |
//! |---|---|
//! | `invalid_credentials`, `invalid_grant` | `auth_invalid_credentials` |
//! | `user_already_exists`, `email_exists`, `phone_exists` | `auth_user_exists` |
//! | `weak_password` | `auth_weak_password` (`min_length`) |
//! | `email_not_confirmed`, `phone_not_confirmed` | `auth_email_not_confirmed` |
//! | `session_*`, `refresh_token_*` | `auth_session_expired` |
//! | `bad_jwt`, `no_authorization` | `auth_invalid_token` |
//! | `over_*_rate_limit`, or HTTP 429 without a code | `auth_rate_limited` |
//! | HTTP 400/401 without a code | `auth_invalid_credentials` |
//! | anything else | `auth_generic` |

use mishap_core::{unmapped, DomainMapper, ErrorCode, ErrorFamily, ErrorValue};

use crate::claims::SessionError;
use crate::failure::{AuthErrorCode, AuthFailure};

pub const DEFAULT_MIN_PASSWORD_LENGTH: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthMapper {
    /// Used for `min_length` when the provider does not report its policy.
    pub default_min_password_length: u32,
}

impl Default for AuthMapper {
    fn default() -> Self {
        Self {
            default_min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
        }
    }
}

impl AuthMapper {
    pub fn new(default_min_password_length: u32) -> Self {
        Self {
            default_min_password_length,
        }
    }

    fn technical(failure: &AuthFailure) -> String {
        match (&failure.code, failure.status) {
            (Some(code), Some(status)) => format!("auth provider {code} (HTTP {status})"),
            (Some(code), None) => format!("auth provider {code}"),
            (None, Some(status)) => format!("auth provider HTTP {status}"),
            (None, None) => "auth provider failure".to_string(),
        }
    }

    fn rate_limited(failure: &AuthFailure) -> ErrorValue {
        let value = ErrorValue::new(ErrorCode::AuthRateLimited, Self::technical(failure))
            .with_detail(failure.message.clone());
        match failure.retry_after_secs {
            Some(secs) => value.with_param("retry_after_seconds", secs),
            None => value,
        }
    }

    #[deny(clippy::wildcard_enum_match_arm)]
    fn map_code(&self, code: &AuthErrorCode, failure: &AuthFailure) -> ErrorValue {
        let simple = |c: ErrorCode| {
            ErrorValue::new(c, Self::technical(failure)).with_detail(failure.message.clone())
        };
        match code {
            AuthErrorCode::InvalidCredentials | AuthErrorCode::InvalidGrant => {
                simple(ErrorCode::AuthInvalidCredentials)
            }
            AuthErrorCode::UserAlreadyExists
            | AuthErrorCode::EmailExists
            | AuthErrorCode::PhoneExists => simple(ErrorCode::AuthUserExists),
            AuthErrorCode::WeakPassword => {
                let min = failure
                    .min_password_length
                    .unwrap_or(self.default_min_password_length);
                simple(ErrorCode::AuthWeakPassword).with_param("min_length", min)
            }
            AuthErrorCode::EmailNotConfirmed | AuthErrorCode::PhoneNotConfirmed => {
                simple(ErrorCode::AuthEmailNotConfirmed)
            }
            AuthErrorCode::SessionExpired
            | AuthErrorCode::SessionNotFound
            | AuthErrorCode::RefreshTokenNotFound
            | AuthErrorCode::RefreshTokenAlreadyUsed => simple(ErrorCode::AuthSessionExpired),
            AuthErrorCode::BadJwt | AuthErrorCode::NoAuthorization => {
                simple(ErrorCode::AuthInvalidToken)
            }
            AuthErrorCode::UserNotFound => simple(ErrorCode::AuthUserNotFound),
            AuthErrorCode::OtpExpired => simple(ErrorCode::AuthOtpExpired),
            AuthErrorCode::SignupDisabled => simple(ErrorCode::AuthSignupDisabled),
            AuthErrorCode::UserBanned => simple(ErrorCode::AuthUserBanned),
            AuthErrorCode::OverRequestRateLimit
            | AuthErrorCode::OverEmailSendRateLimit
            | AuthErrorCode::OverSmsSendRateLimit => Self::rate_limited(failure),
            AuthErrorCode::Other(raw) => match failure.status {
                // An unknown code with a rate-limit status is still a rate limit.
                Some(429) => Self::rate_limited(failure),
                Some(_) | None => unmapped(ErrorFamily::Auth, raw, &failure.message),
            },
        }
    }

    fn map_status(&self, failure: &AuthFailure) -> ErrorValue {
        match failure.status {
            Some(429) => Self::rate_limited(failure),
            Some(400) | Some(401) => {
                ErrorValue::new(ErrorCode::AuthInvalidCredentials, Self::technical(failure))
                    .with_detail(failure.message.clone())
            }
            Some(status) => unmapped(ErrorFamily::Auth, &format!("http_{status}"), &failure.message),
            None => unmapped(ErrorFamily::Auth, "none", &failure.message),
        }
    }
}

impl DomainMapper<AuthFailure> for AuthMapper {
    fn map(&self, failure: &AuthFailure) -> ErrorValue {
        match &failure.code {
            Some(code) => self.map_code(code, failure),
            None => self.map_status(failure),
        }
    }
}

#[deny(clippy::wildcard_enum_match_arm)]
impl DomainMapper<SessionError> for AuthMapper {
    fn map(&self, failure: &SessionError) -> ErrorValue {
        let code = match failure {
            SessionError::Expired => ErrorCode::AuthSessionExpired,
            SessionError::NotYetValid | SessionError::InvalidTimeWindow => {
                ErrorCode::AuthInvalidToken
            }
        };
        ErrorValue::new(code, failure.to_string())
    }
}
