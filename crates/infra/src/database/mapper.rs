//! Database failure mapper.
//!
//! | Failure | SQLSTATE | ErrorCode |
//! |---------|----------|-----------|
//! | unique violation | `23505` | `database_unique_constraint` |
//! | foreign key violation | `23503` | `database_foreign_key` |
//! | not-null violation | `23502` | `database_not_null` |
//! | check violation | `23514` | `database_check_constraint` |
//! | insufficient privilege (row-level policy) | `42501` | `database_permission_denied` |
//! | malformed input | `22P02`, `22001`, `22003`, `22007` | `database_invalid_input` |
//! | serialization failure / deadlock | `40001`, `40P01` | `database_conflict` |
//! | statement canceled | `57014` | `database_timeout` |
//! | connection class | `08xxx`, `53300`, `57P01`, `57P02`, `57P03` | `database_connection_failed` |
//! | single row expected | `PGRST116` | `database_not_found` |
//! | JWT rejected by the data API | `PGRST301`, `PGRST303` | `auth_session_expired` |
//! | undefined table / column | `42P01`, `42703` | `database_generic` |
//! | RowNotFound | N/A | `database_not_found` |
//! | PoolTimedOut | N/A | `database_timeout` |
//! | PoolClosed, Io, Tls | N/A | `database_connection_failed` |
//! | Protocol, Decode | N/A | `database_generic` |
//! | anything else | any | `database_generic` |
//!
//! Constraint and column names are schema identifiers: they go to
//! `technical_detail`, never to display params.

use mishap_core::{unmapped, DomainMapper, ErrorCode, ErrorFamily, ErrorValue};

use super::failure::{DatabaseFailure, QueryError, SqlState};

#[derive(Debug, Default, Clone, Copy)]
pub struct DatabaseMapper;

impl DatabaseMapper {
    fn diagnostics(err: &QueryError) -> Option<String> {
        let parts = [
            ("detail", &err.detail),
            ("hint", &err.hint),
            ("constraint", &err.constraint),
            ("column", &err.column),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.as_deref().map(|v| format!("{name}={v}")))
        .collect::<Vec<_>>();
        (!parts.is_empty()).then(|| parts.join(" "))
    }

    #[deny(clippy::wildcard_enum_match_arm)]
    fn map_query(&self, err: &QueryError) -> ErrorValue {
        let state = &err.state;
        let with_ctx = |code: ErrorCode| {
            ErrorValue::new(code, format!("database error {state}: {}", err.message))
                .with_optional_detail(Self::diagnostics(err))
        };

        match state {
            SqlState::UniqueViolation => with_ctx(ErrorCode::DatabaseUniqueConstraint),
            SqlState::ForeignKeyViolation => with_ctx(ErrorCode::DatabaseForeignKey),
            SqlState::NotNullViolation => with_ctx(ErrorCode::DatabaseNotNull),
            SqlState::CheckViolation => with_ctx(ErrorCode::DatabaseCheckConstraint),
            SqlState::InsufficientPrivilege => with_ctx(ErrorCode::DatabasePermissionDenied),
            SqlState::InvalidTextRepresentation
            | SqlState::StringDataRightTruncation
            | SqlState::NumericValueOutOfRange
            | SqlState::InvalidDatetimeFormat => with_ctx(ErrorCode::DatabaseInvalidInput),
            SqlState::SerializationFailure | SqlState::DeadlockDetected => {
                with_ctx(ErrorCode::DatabaseConflict)
            }
            SqlState::QueryCanceled => with_ctx(ErrorCode::DatabaseTimeout),
            SqlState::ConnectionException
            | SqlState::UnableToEstablishConnection
            | SqlState::ConnectionDoesNotExist
            | SqlState::ConnectionFailure
            | SqlState::ProtocolViolation
            | SqlState::TooManyConnections
            | SqlState::AdminShutdown
            | SqlState::CrashShutdown
            | SqlState::CannotConnectNow => with_ctx(ErrorCode::DatabaseConnectionFailed),
            SqlState::NoSingleRow => with_ctx(ErrorCode::DatabaseNotFound),
            SqlState::JwtExpired | SqlState::JwtInvalid => with_ctx(ErrorCode::AuthSessionExpired),
            // Schema drift between client and server; a bug, not a user condition.
            SqlState::UndefinedTable | SqlState::UndefinedColumn => {
                with_ctx(ErrorCode::DatabaseGeneric)
            }
            SqlState::Other(_) if state.is_connection_class() => {
                with_ctx(ErrorCode::DatabaseConnectionFailed)
            }
            SqlState::Other(raw) => unmapped(ErrorFamily::Database, raw, &err.message),
        }
    }
}

#[deny(clippy::wildcard_enum_match_arm)]
impl DomainMapper<DatabaseFailure> for DatabaseMapper {
    fn map(&self, failure: &DatabaseFailure) -> ErrorValue {
        let technical = failure.to_string();
        match failure {
            DatabaseFailure::Query(err) => self.map_query(err),
            DatabaseFailure::RowNotFound => ErrorValue::new(ErrorCode::DatabaseNotFound, technical),
            DatabaseFailure::PoolTimedOut => ErrorValue::new(ErrorCode::DatabaseTimeout, technical),
            DatabaseFailure::PoolClosed
            | DatabaseFailure::Io { .. }
            | DatabaseFailure::Tls { .. } => {
                ErrorValue::new(ErrorCode::DatabaseConnectionFailed, technical)
            }
            DatabaseFailure::Protocol { .. } | DatabaseFailure::Decode { .. } => {
                ErrorValue::new(ErrorCode::DatabaseGeneric, technical)
            }
        }
    }
}
