//! Infrastructure boundary: database and network failure families, the
//! dispatch layer, and mapper configuration.

pub mod config;
pub mod database;
pub mod dispatch;
pub mod network;

pub use config::MapperConfig;
pub use database::{DatabaseFailure, DatabaseMapper, QueryError, SqlState};
pub use dispatch::{execute, execute_async, CustomFailure, DispatchResultExt, Dispatcher, RawFailure};
pub use network::{NetworkFailure, NetworkMapper};
