//! Conversion from SQLx errors (feature `postgres`).
//!
//! | SQLx Error | DatabaseFailure |
//! |------------|-----------------|
//! | Database | `Query` (SQLSTATE, message, constraint, and Postgres detail/hint/column) |
//! | RowNotFound | `RowNotFound` |
//! | PoolTimedOut | `PoolTimedOut` |
//! | PoolClosed, WorkerCrashed | `PoolClosed` |
//! | Io | `Io` |
//! | Tls | `Tls` |
//! | Decode, ColumnDecode | `Decode` |
//! | Other | `Protocol` |

use sqlx::postgres::PgDatabaseError;

use super::failure::{DatabaseFailure, QueryError, SqlState};

impl From<sqlx::Error> for DatabaseFailure {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let state = db_err
                    .code()
                    .map(|c| SqlState::from(c.as_ref()))
                    .unwrap_or_else(|| SqlState::Other("unknown".to_string()));
                let mut query = QueryError::new(state, db_err.message());
                if let Some(constraint) = db_err.constraint() {
                    query = query.with_constraint(constraint);
                }
                if let Some(pg) = db_err.try_downcast_ref::<PgDatabaseError>() {
                    query.detail = pg.detail().map(str::to_string);
                    query.hint = pg.hint().map(str::to_string);
                    query.column = pg.column().map(str::to_string);
                }
                DatabaseFailure::Query(query)
            }
            sqlx::Error::RowNotFound => DatabaseFailure::RowNotFound,
            sqlx::Error::PoolTimedOut => DatabaseFailure::PoolTimedOut,
            sqlx::Error::PoolClosed | sqlx::Error::WorkerCrashed => DatabaseFailure::PoolClosed,
            sqlx::Error::Io(e) => DatabaseFailure::Io {
                message: e.to_string(),
            },
            sqlx::Error::Tls(e) => DatabaseFailure::Tls {
                message: e.to_string(),
            },
            sqlx::Error::Decode(e) => DatabaseFailure::Decode {
                message: e.to_string(),
            },
            sqlx::Error::ColumnDecode { index, source } => DatabaseFailure::Decode {
                message: format!("column {index}: {source}"),
            },
            other => DatabaseFailure::Protocol {
                message: other.to_string(),
            },
        }
    }
}
