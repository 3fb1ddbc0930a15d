//! Database / data-API failure family.
//!
//! The failure shape follows the Postgres client surface (SQLSTATE discriminants
//! plus pool/transport conditions) so both a direct driver and a REST data API
//! can feed the same mapper.

pub mod failure;
pub mod mapper;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use failure::{DatabaseFailure, QueryError, SqlState};
pub use mapper::DatabaseMapper;
