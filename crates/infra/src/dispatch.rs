//! Failure dispatch at the data/auth boundary.
//!
//! ```text
//! operation() -> Result<T, RawFailure>
//!   ↓ Ok(T)            → passed through unchanged
//!   ↓ Err(Mapped(v))   → passed through unchanged (already mapped upstream)
//!   ↓ Err(family)      → routed to that family's mapper → ErrorValue
//!   ↓ Err(Unknown(e))  → unknown_error, raw text only in technical_detail
//! ```
//!
//! Every freshly mapped failure is written once to the dispatcher's
//! [`FailureSink`]. A mapper that panics yields `unknown_error` instead of taking
//! the host operation down.
//!
//! The dispatcher adds no concurrency, cancellation or timeouts of its own: for
//! async operations it only observes the terminal result.

use core::fmt;
use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use mishap_auth::{AuthFailure, AuthMapper, SessionError};
use mishap_core::{
    BusinessMapper, DomainError, DomainMapper, ErrorCode, ErrorValue, ValidationFailure,
    ValidationMapper,
};
use mishap_observability::{FailureSink, TracingSink};

use crate::config::MapperConfig;
use crate::database::{DatabaseFailure, DatabaseMapper};
use crate::network::{NetworkFailure, NetworkMapper};

/// Application-defined failure family that knows its own mapping.
///
/// Lets a caller plug an extra family into the dispatcher without touching the
/// built-in ones. Implementations follow the same rules as built-in mappers.
pub trait CustomFailure: fmt::Debug + Send + Sync + 'static {
    /// Short family name for logs.
    fn family(&self) -> &'static str;

    fn to_error_value(&self) -> ErrorValue;
}

/// Every failure shape the dispatcher knows how to route.
#[derive(Debug)]
pub enum RawFailure {
    /// Already mapped by a nested boundary; passed through untouched.
    Mapped(ErrorValue),
    Database(DatabaseFailure),
    Network(NetworkFailure),
    Auth(AuthFailure),
    Session(SessionError),
    Validation(ValidationFailure),
    Domain(DomainError),
    Custom(Box<dyn CustomFailure>),
    /// Anything else. Mapped to `unknown_error`.
    Unknown(anyhow::Error),
}

impl RawFailure {
    pub fn unknown(err: impl Into<anyhow::Error>) -> Self {
        RawFailure::Unknown(err.into())
    }

    pub fn custom(failure: impl CustomFailure) -> Self {
        RawFailure::Custom(Box::new(failure))
    }

    /// Family name used in spans and diagnostics.
    pub fn family(&self) -> &'static str {
        match self {
            RawFailure::Mapped(_) => "mapped",
            RawFailure::Database(_) => "database",
            RawFailure::Network(_) => "network",
            RawFailure::Auth(_) => "auth",
            RawFailure::Session(_) => "session",
            RawFailure::Validation(_) => "validation",
            RawFailure::Domain(_) => "business",
            RawFailure::Custom(c) => c.family(),
            RawFailure::Unknown(_) => "unknown",
        }
    }
}

impl From<ErrorValue> for RawFailure {
    fn from(value: ErrorValue) -> Self {
        RawFailure::Mapped(value)
    }
}

impl From<DatabaseFailure> for RawFailure {
    fn from(value: DatabaseFailure) -> Self {
        RawFailure::Database(value)
    }
}

impl From<NetworkFailure> for RawFailure {
    fn from(value: NetworkFailure) -> Self {
        RawFailure::Network(value)
    }
}

impl From<std::io::Error> for RawFailure {
    fn from(value: std::io::Error) -> Self {
        RawFailure::Network(value.into())
    }
}

impl From<AuthFailure> for RawFailure {
    fn from(value: AuthFailure) -> Self {
        RawFailure::Auth(value)
    }
}

impl From<SessionError> for RawFailure {
    fn from(value: SessionError) -> Self {
        RawFailure::Session(value)
    }
}

impl From<ValidationFailure> for RawFailure {
    fn from(value: ValidationFailure) -> Self {
        RawFailure::Validation(value)
    }
}

impl From<DomainError> for RawFailure {
    fn from(value: DomainError) -> Self {
        RawFailure::Domain(value)
    }
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for RawFailure {
    fn from(value: sqlx::Error) -> Self {
        RawFailure::Database(value.into())
    }
}

impl From<anyhow::Error> for RawFailure {
    /// Recover a known family from a type-erased error before giving up.
    fn from(err: anyhow::Error) -> Self {
        let err = match err.downcast::<ErrorValue>() {
            Ok(v) => return RawFailure::Mapped(v),
            Err(e) => e,
        };
        let err = match err.downcast::<DatabaseFailure>() {
            Ok(v) => return RawFailure::Database(v),
            Err(e) => e,
        };
        #[cfg(feature = "postgres")]
        let err = match err.downcast::<sqlx::Error>() {
            Ok(v) => return RawFailure::Database(v.into()),
            Err(e) => e,
        };
        let err = match err.downcast::<NetworkFailure>() {
            Ok(v) => return RawFailure::Network(v),
            Err(e) => e,
        };
        let err = match err.downcast::<std::io::Error>() {
            Ok(v) => return RawFailure::Network(v.into()),
            Err(e) => e,
        };
        let err = match err.downcast::<AuthFailure>() {
            Ok(v) => return RawFailure::Auth(v),
            Err(e) => e,
        };
        let err = match err.downcast::<SessionError>() {
            Ok(v) => return RawFailure::Session(v),
            Err(e) => e,
        };
        let err = match err.downcast::<ValidationFailure>() {
            Ok(v) => return RawFailure::Validation(v),
            Err(e) => e,
        };
        match err.downcast::<DomainError>() {
            Ok(v) => RawFailure::Domain(v),
            Err(e) => RawFailure::Unknown(e),
        }
    }
}

/// Boundary wrapper guaranteeing only [`ErrorValue`]s leave the data/auth layer.
#[derive(Clone)]
pub struct Dispatcher {
    boundary: String,
    database: DatabaseMapper,
    network: NetworkMapper,
    auth: AuthMapper,
    validation: ValidationMapper,
    business: BusinessMapper,
    sink: Arc<dyn FailureSink>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("boundary", &self.boundary)
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new("default")
    }
}

impl Dispatcher {
    /// Dispatcher for the named boundary (e.g. `profiles`), logging through `tracing`.
    pub fn new(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            database: DatabaseMapper,
            network: NetworkMapper,
            auth: AuthMapper::default(),
            validation: ValidationMapper,
            business: BusinessMapper,
            sink: Arc::new(TracingSink),
        }
    }

    pub fn from_config(boundary: impl Into<String>, config: &MapperConfig) -> Self {
        Self::new(boundary).with_auth_mapper(AuthMapper::new(config.min_password_length))
    }

    pub fn with_sink(mut self, sink: Arc<dyn FailureSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_auth_mapper(mut self, auth: AuthMapper) -> Self {
        self.auth = auth;
        self
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Run `operation`, translating any failure into an [`ErrorValue`].
    #[tracing::instrument(name = "dispatch", level = "debug", skip_all, fields(boundary = %self.boundary()))]
    pub fn execute<T, F>(&self, operation: F) -> Result<T, ErrorValue>
    where
        F: FnOnce() -> Result<T, RawFailure>,
    {
        operation().map_err(|failure| self.map_failure(failure))
    }

    /// Async counterpart of [`Dispatcher::execute`].
    #[tracing::instrument(name = "dispatch", level = "debug", skip_all, fields(boundary = %self.boundary()))]
    pub async fn execute_async<T, F, Fut>(&self, operation: F) -> Result<T, ErrorValue>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, RawFailure>>,
    {
        operation().await.map_err(|failure| self.map_failure(failure))
    }

    /// Map a single failure. Already-mapped values pass through without being
    /// logged a second time.
    pub fn map_failure(&self, failure: RawFailure) -> ErrorValue {
        if let RawFailure::Mapped(value) = failure {
            tracing::trace!(code = %value.code(), "already mapped; passing through");
            return value;
        }

        let family = failure.family();
        let value = match panic::catch_unwind(AssertUnwindSafe(|| self.route(&failure))) {
            Ok(value) => value,
            Err(payload) => {
                let reason = panic_message(payload.as_ref());
                tracing::error!(family, reason = %reason, "failure mapper panicked");
                ErrorValue::new(ErrorCode::UnknownError, format!("{family} mapper failed"))
                    .with_detail(format!("panic={reason} failure={failure:?}"))
            }
        };

        tracing::debug!(family, code = %value.code(), "mapped failure");
        let record = value.record(self.boundary());
        if panic::catch_unwind(AssertUnwindSafe(|| self.sink.write(&record))).is_err() {
            tracing::error!(record_id = %record.record_id, "failure sink panicked; record dropped");
        }
        value
    }

    fn route(&self, failure: &RawFailure) -> ErrorValue {
        match failure {
            RawFailure::Mapped(value) => value.clone(),
            RawFailure::Database(f) => self.database.map(f),
            RawFailure::Network(f) => self.network.map(f),
            RawFailure::Auth(f) => self.auth.map(f),
            RawFailure::Session(f) => self.auth.map(f),
            RawFailure::Validation(f) => self.validation.map(f),
            RawFailure::Domain(f) => self.business.map(f),
            RawFailure::Custom(f) => f.to_error_value(),
            RawFailure::Unknown(err) => {
                ErrorValue::new(ErrorCode::UnknownError, "unrecognized failure type")
                    .with_detail(format!("{err:#}"))
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Run `operation` through a default dispatcher.
pub fn execute<T, F>(operation: F) -> Result<T, ErrorValue>
where
    F: FnOnce() -> Result<T, RawFailure>,
{
    Dispatcher::default().execute(operation)
}

/// Run an async `operation` through a default dispatcher.
pub async fn execute_async<T, F, Fut>(operation: F) -> Result<T, ErrorValue>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, RawFailure>>,
{
    Dispatcher::default().execute_async(operation).await
}

/// Map a typed failure at a boundary without wrapping the whole operation.
pub trait DispatchResultExt<T> {
    fn at_boundary(self, dispatcher: &Dispatcher) -> Result<T, ErrorValue>;
}

impl<T, E> DispatchResultExt<T> for Result<T, E>
where
    E: Into<RawFailure>,
{
    fn at_boundary(self, dispatcher: &Dispatcher) -> Result<T, ErrorValue> {
        self.map_err(|e| dispatcher.map_failure(e.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mishap_auth::AuthErrorCode;
    use mishap_core::ValidationRule;
    use mishap_observability::MemorySink;

    fn dispatcher_with_sink() -> (Dispatcher, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let dispatcher = Dispatcher::new("test").with_sink(sink.clone());
        (dispatcher, sink)
    }

    fn unique_violation() -> RawFailure {
        DatabaseFailure::query("23505", "duplicate key value violates unique constraint").into()
    }

    #[test]
    fn success_passes_through() {
        let (d, sink) = dispatcher_with_sink();
        assert_eq!(d.execute(|| Ok::<_, RawFailure>(42)), Ok(42));
        assert!(sink.is_empty());
    }

    #[test]
    fn routes_each_family() {
        let (d, _) = dispatcher_with_sink();
        let cases: Vec<(RawFailure, ErrorCode)> = vec![
            (unique_violation(), ErrorCode::DatabaseUniqueConstraint),
            (NetworkFailure::status(503).into(), ErrorCode::NetworkServerError),
            (
                AuthFailure::new(AuthErrorCode::InvalidCredentials, "Invalid login").into(),
                ErrorCode::AuthInvalidCredentials,
            ),
            (SessionError::Expired.into(), ErrorCode::AuthSessionExpired),
            (
                ValidationFailure::new("email", ValidationRule::InvalidEmail).into(),
                ErrorCode::ValidationInvalidEmail,
            ),
            (DomainError::conflict("already paid").into(), ErrorCode::BusinessConflict),
        ];
        for (failure, code) in cases {
            let result: Result<(), ErrorValue> = d.execute(|| Err(failure));
            assert_eq!(result.unwrap_err().code(), code);
        }
    }

    #[test]
    fn unknown_failure_keeps_raw_text_in_detail_only() {
        let (d, _) = dispatcher_with_sink();
        let result: Result<(), _> =
            d.execute(|| Err(RawFailure::unknown(anyhow::anyhow!("socket hung up: ECONNRESET"))));
        let value = result.unwrap_err();
        assert_eq!(value.code(), ErrorCode::UnknownError);
        assert_eq!(value.technical_message(), "unrecognized failure type");
        assert_eq!(value.technical_detail(), Some("socket hung up: ECONNRESET"));
    }

    #[test]
    fn nested_dispatch_does_not_double_wrap() {
        let (outer, sink) = dispatcher_with_sink();
        let inner = Dispatcher::new("inner").with_sink(sink.clone());

        let single: Result<(), _> = inner.execute(|| Err(unique_violation()));
        let nested: Result<(), _> = outer.execute(|| {
            inner.execute::<(), _>(|| Err(unique_violation()))?;
            Ok(())
        });

        assert_eq!(nested, single);
        // one record per mapping, none for the pass-through
        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.boundary == "inner"));
    }

    #[test]
    fn anyhow_errors_are_recovered_by_family() {
        let err = anyhow::Error::new(NetworkFailure::status(404));
        assert!(matches!(RawFailure::from(err), RawFailure::Network(_)));

        let err = anyhow::Error::new(ErrorValue::new(ErrorCode::BusinessForbidden, "no"));
        assert!(matches!(RawFailure::from(err), RawFailure::Mapped(_)));

        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "slow");
        assert!(matches!(RawFailure::from(anyhow::Error::new(io)), RawFailure::Network(_)));

        let other = anyhow::anyhow!("something odd");
        assert!(matches!(RawFailure::from(other), RawFailure::Unknown(_)));
    }

    #[derive(Debug)]
    struct Exploding;

    impl CustomFailure for Exploding {
        fn family(&self) -> &'static str {
            "exploding"
        }

        fn to_error_value(&self) -> ErrorValue {
            panic!("malformed failure object")
        }
    }

    #[derive(Debug)]
    struct PaymentDeclined;

    impl CustomFailure for PaymentDeclined {
        fn family(&self) -> &'static str {
            "payments"
        }

        fn to_error_value(&self) -> ErrorValue {
            ErrorValue::new(ErrorCode::BusinessRuleViolation, "card declined")
        }
    }

    #[test]
    fn panicking_mapper_becomes_unknown_error() {
        let (d, sink) = dispatcher_with_sink();
        let result: Result<(), _> = d.execute(|| Err(RawFailure::custom(Exploding)));
        let value = result.unwrap_err();
        assert_eq!(value.code(), ErrorCode::UnknownError);
        assert!(value.technical_detail().unwrap().contains("malformed failure object"));
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn custom_family_maps_itself() {
        let (d, _) = dispatcher_with_sink();
        let result: Result<(), _> = d.execute(|| Err(RawFailure::custom(PaymentDeclined)));
        assert_eq!(result.unwrap_err().code(), ErrorCode::BusinessRuleViolation);
    }

    #[test]
    fn sink_receives_technical_record() {
        let (d, sink) = dispatcher_with_sink();
        let _ = d.execute::<(), _>(|| Err(DatabaseFailure::query("XX000", "internal_error").into()));
        let record = &sink.records()[0];
        assert_eq!(record.code, ErrorCode::DatabaseGeneric);
        assert_eq!(record.boundary, "test");
        assert_eq!(
            record.technical_detail.as_deref(),
            Some("discriminant=XX000 message=internal_error")
        );
    }

    #[test]
    fn config_drives_auth_mapper() {
        let config = MapperConfig {
            min_password_length: 12,
        };
        let d = Dispatcher::from_config("auth", &config).with_sink(Arc::new(MemorySink::new()));
        assert_eq!(d.boundary(), "auth");
        let result: Result<(), _> =
            d.execute(|| Err(AuthFailure::new("weak_password", "weak").into()));
        assert_eq!(result.unwrap_err().param("min_length"), Some("12"));
    }

    #[test]
    fn result_extension_maps_at_boundary() {
        let (d, _) = dispatcher_with_sink();
        let result: Result<u8, SessionError> = Err(SessionError::NotYetValid);
        assert_eq!(
            result.at_boundary(&d).unwrap_err().code(),
            ErrorCode::AuthInvalidToken
        );
    }

    #[tokio::test]
    async fn async_operations_are_observed_at_completion() {
        let (d, sink) = dispatcher_with_sink();
        let ok = d.execute_async(|| async { Ok::<_, RawFailure>("row") }).await;
        assert_eq!(ok, Ok("row"));

        let err: Result<(), _> = d
            .execute_async(|| async {
                Err::<(), RawFailure>(NetworkFailure::timeout(std::time::Duration::from_secs(5)).into())
            })
            .await;
        assert_eq!(err.unwrap_err().code(), ErrorCode::NetworkTimeout);
        assert_eq!(sink.len(), 1);
    }

    #[tokio::test]
    async fn free_functions_use_default_dispatcher() {
        let value = execute_async(|| async { Err::<(), RawFailure>(SessionError::Expired.into()) })
            .await
            .unwrap_err();
        assert_eq!(value.code(), ErrorCode::AuthSessionExpired);

        let value = execute::<(), _>(|| Err(DomainError::not_found("invoice").into())).unwrap_err();
        assert_eq!(value.code(), ErrorCode::BusinessNotFound);
    }
}
