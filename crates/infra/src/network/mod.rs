//! Network transport failure family.

pub mod failure;
pub mod mapper;

pub use failure::NetworkFailure;
pub use mapper::NetworkMapper;
