use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// SQLSTATE / PostgREST discriminants the database mapper recognizes.
///
/// Parsing is total: anything unrecognized becomes [`SqlState::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SqlState {
    /// `23505`
    UniqueViolation,
    /// `23503`
    ForeignKeyViolation,
    /// `23502`
    NotNullViolation,
    /// `23514`
    CheckViolation,
    /// `42501`
    InsufficientPrivilege,
    /// `22P02`
    InvalidTextRepresentation,
    /// `22001`
    StringDataRightTruncation,
    /// `22003`
    NumericValueOutOfRange,
    /// `22007`
    InvalidDatetimeFormat,
    /// `40001`
    SerializationFailure,
    /// `40P01`
    DeadlockDetected,
    /// `57014` (statement timeout / cancel)
    QueryCanceled,
    /// `08000`
    ConnectionException,
    /// `08001`
    UnableToEstablishConnection,
    /// `08003`
    ConnectionDoesNotExist,
    /// `08006`
    ConnectionFailure,
    /// `08P01`
    ProtocolViolation,
    /// `53300`
    TooManyConnections,
    /// `57P01`
    AdminShutdown,
    /// `57P02`
    CrashShutdown,
    /// `57P03` (server starting up or in recovery)
    CannotConnectNow,
    /// `42P01`
    UndefinedTable,
    /// `42703`
    UndefinedColumn,
    /// PostgREST `PGRST116`: zero or several rows where exactly one was requested.
    NoSingleRow,
    /// PostgREST `PGRST301`: JWT expired.
    JwtExpired,
    /// PostgREST `PGRST303`: JWT claims invalid.
    JwtInvalid,
    Other(String),
}

impl SqlState {
    /// True for SQLSTATE class `08` (connection exception), including codes without
    /// a dedicated variant.
    pub fn is_connection_class(&self) -> bool {
        self.as_str().starts_with("08")
    }

    pub fn as_str(&self) -> &str {
        match self {
            SqlState::UniqueViolation => "23505",
            SqlState::ForeignKeyViolation => "23503",
            SqlState::NotNullViolation => "23502",
            SqlState::CheckViolation => "23514",
            SqlState::InsufficientPrivilege => "42501",
            SqlState::InvalidTextRepresentation => "22P02",
            SqlState::StringDataRightTruncation => "22001",
            SqlState::NumericValueOutOfRange => "22003",
            SqlState::InvalidDatetimeFormat => "22007",
            SqlState::SerializationFailure => "40001",
            SqlState::DeadlockDetected => "40P01",
            SqlState::QueryCanceled => "57014",
            SqlState::ConnectionException => "08000",
            SqlState::UnableToEstablishConnection => "08001",
            SqlState::ConnectionDoesNotExist => "08003",
            SqlState::ConnectionFailure => "08006",
            SqlState::ProtocolViolation => "08P01",
            SqlState::TooManyConnections => "53300",
            SqlState::AdminShutdown => "57P01",
            SqlState::CrashShutdown => "57P02",
            SqlState::CannotConnectNow => "57P03",
            SqlState::UndefinedTable => "42P01",
            SqlState::UndefinedColumn => "42703",
            SqlState::NoSingleRow => "PGRST116",
            SqlState::JwtExpired => "PGRST301",
            SqlState::JwtInvalid => "PGRST303",
            SqlState::Other(code) => code,
        }
    }
}

impl From<&str> for SqlState {
    fn from(code: &str) -> Self {
        match code {
            "23505" => SqlState::UniqueViolation,
            "23503" => SqlState::ForeignKeyViolation,
            "23502" => SqlState::NotNullViolation,
            "23514" => SqlState::CheckViolation,
            "42501" => SqlState::InsufficientPrivilege,
            "22P02" => SqlState::InvalidTextRepresentation,
            "22001" => SqlState::StringDataRightTruncation,
            "22003" => SqlState::NumericValueOutOfRange,
            "22007" => SqlState::InvalidDatetimeFormat,
            "40001" => SqlState::SerializationFailure,
            "40P01" => SqlState::DeadlockDetected,
            "57014" => SqlState::QueryCanceled,
            "08000" => SqlState::ConnectionException,
            "08001" => SqlState::UnableToEstablishConnection,
            "08003" => SqlState::ConnectionDoesNotExist,
            "08006" => SqlState::ConnectionFailure,
            "08P01" => SqlState::ProtocolViolation,
            "53300" => SqlState::TooManyConnections,
            "57P01" => SqlState::AdminShutdown,
            "57P02" => SqlState::CrashShutdown,
            "57P03" => SqlState::CannotConnectNow,
            "42P01" => SqlState::UndefinedTable,
            "42703" => SqlState::UndefinedColumn,
            "PGRST116" => SqlState::NoSingleRow,
            "PGRST301" => SqlState::JwtExpired,
            "PGRST303" => SqlState::JwtInvalid,
            other => SqlState::Other(other.to_string()),
        }
    }
}

impl From<String> for SqlState {
    fn from(code: String) -> Self {
        SqlState::from(code.as_str())
    }
}

impl From<SqlState> for String {
    fn from(state: SqlState) -> Self {
        state.as_str().to_string()
    }
}

impl fmt::Display for SqlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised by the server for a specific statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryError {
    pub state: SqlState,
    pub message: String,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
    /// Violated constraint name, when the server reports one. Diagnostic only.
    #[serde(default)]
    pub constraint: Option<String>,
    #[serde(default)]
    pub column: Option<String>,
}

impl QueryError {
    pub fn new(state: impl Into<SqlState>, message: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            message: message.into(),
            detail: None,
            hint: None,
            constraint: None,
            column: None,
        }
    }

    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraint = Some(constraint.into());
        self
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Database / data-API failure family.
///
/// Shaped after the client library's error surface so that a real client error
/// converts without loss (see the `postgres` feature).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DatabaseFailure {
    #[error("database error {}: {}", .0.state, .0.message)]
    Query(QueryError),

    #[error("no rows returned")]
    RowNotFound,

    #[error("timed out waiting for a pooled connection")]
    PoolTimedOut,

    #[error("connection pool closed")]
    PoolClosed,

    #[error("database io error: {message}")]
    Io { message: String },

    #[error("database tls error: {message}")]
    Tls { message: String },

    #[error("database protocol error: {message}")]
    Protocol { message: String },

    #[error("failed to decode database response: {message}")]
    Decode { message: String },
}

impl DatabaseFailure {
    /// Shorthand for a server-side statement error.
    pub fn query(state: impl Into<SqlState>, message: impl Into<String>) -> Self {
        DatabaseFailure::Query(QueryError::new(state, message))
    }
}

impl From<QueryError> for DatabaseFailure {
    fn from(value: QueryError) -> Self {
        DatabaseFailure::Query(value)
    }
}
