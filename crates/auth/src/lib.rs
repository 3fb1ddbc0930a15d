//! `mishap-auth` — authentication-service failures and their mapping.
//!
//! This crate is decoupled from any HTTP client: it models what the auth provider
//! reports and translates it into `mishap-core` error values.

pub mod claims;
pub mod failure;
pub mod mapper;

pub use claims::{validate_session, SessionClaims, SessionError};
pub use failure::{AuthErrorCode, AuthFailure};
pub use mapper::{AuthMapper, DEFAULT_MIN_PASSWORD_LENGTH};
