use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Session token claims (transport-agnostic).
///
/// The minimal set of claims needed once a token has been decoded and its
/// signature verified by the client library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject / user identifier.
    pub sub: String,

    /// Issued-at timestamp.
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("session has expired")]
    Expired,

    #[error("session not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid session time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate session claims against `now`.
pub fn validate_session(claims: &SessionClaims, now: DateTime<Utc>) -> Result<(), SessionError> {
    if claims.expires_at <= claims.issued_at {
        return Err(SessionError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(SessionError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(SessionError::Expired);
    }
    Ok(())
}
