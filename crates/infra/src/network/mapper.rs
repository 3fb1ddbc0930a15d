//! Network failure mapper.
//!
//! | Failure | ErrorCode |
//! |---------|-----------|
//! | NoConnection, DnsLookup, ConnectionRefused | `network_no_connection` |
//! | Timeout, HTTP 408, HTTP 504 | `network_timeout` |
//! | Tls | `network_secure_connection_failed` |
//! | HTTP 401 | `auth_session_expired` |
//! | HTTP 404 | `network_not_found` |
//! | HTTP 429 | `network_rate_limited` |
//! | other HTTP 4xx | `network_request_rejected` |
//! | other HTTP 5xx | `network_server_error` |
//! | InvalidResponse | `network_bad_response` |
//! | other status, Unclassified | `network_generic` |
//!
//! The status code and response body are recorded in `technical_detail` only.

use mishap_core::{unmapped, DomainMapper, ErrorCode, ErrorFamily, ErrorValue};

use super::failure::NetworkFailure;

#[derive(Debug, Default, Clone, Copy)]
pub struct NetworkMapper;

impl NetworkMapper {
    fn map_status(&self, status: u16, body: Option<&str>, technical: String) -> ErrorValue {
        let code = match status {
            401 => ErrorCode::AuthSessionExpired,
            404 => ErrorCode::NetworkNotFound,
            408 | 504 => ErrorCode::NetworkTimeout,
            429 => ErrorCode::NetworkRateLimited,
            400..=499 => ErrorCode::NetworkRequestRejected,
            500..=599 => ErrorCode::NetworkServerError,
            other => {
                return unmapped(
                    ErrorFamily::Network,
                    &format!("http_{other}"),
                    body.unwrap_or_default(),
                );
            }
        };
        let detail = match body {
            Some(body) => format!("status={status} body={body}"),
            None => format!("status={status}"),
        };
        ErrorValue::new(code, technical).with_detail(detail)
    }
}

#[deny(clippy::wildcard_enum_match_arm)]
impl DomainMapper<NetworkFailure> for NetworkMapper {
    fn map(&self, failure: &NetworkFailure) -> ErrorValue {
        let technical = failure.to_string();
        match failure {
            NetworkFailure::NoConnection { .. }
            | NetworkFailure::DnsLookup { .. }
            | NetworkFailure::ConnectionRefused { .. } => {
                ErrorValue::new(ErrorCode::NetworkNoConnection, technical)
            }
            NetworkFailure::Timeout { after } => {
                ErrorValue::new(ErrorCode::NetworkTimeout, technical)
                    .with_optional_detail(after.map(|d| format!("after_ms={}", d.as_millis())))
            }
            NetworkFailure::Tls { .. } => {
                ErrorValue::new(ErrorCode::NetworkSecureConnectionFailed, technical)
            }
            NetworkFailure::HttpStatus { status, body } => {
                self.map_status(*status, body.as_deref(), technical)
            }
            NetworkFailure::InvalidResponse { .. } => {
                ErrorValue::new(ErrorCode::NetworkBadResponse, technical)
            }
            NetworkFailure::Unclassified { class, message } => {
                unmapped(ErrorFamily::Network, class, message)
            }
        }
    }
}
