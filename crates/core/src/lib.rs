//! `mishap-core` — error registry, error value, and the pure mappers for locally
//! raised failures (validation and business rules).
//!
//! This crate contains no IO; backend and transport families live in
//! `mishap-auth` and `mishap-infra`.

pub mod code;
pub mod error;
pub mod mapper;
pub mod record;
pub mod template;
pub mod validation;
pub mod value;

pub use code::{ErrorCode, ErrorFamily, Severity, UnknownErrorCode};
pub use error::{BusinessMapper, DomainError};
pub use mapper::{unmapped, DomainMapper};
pub use record::FailureRecord;
pub use template::{render, GENERIC_FALLBACK_MESSAGE};
pub use validation::{ValidationFailure, ValidationMapper, ValidationRule};
pub use value::ErrorValue;
