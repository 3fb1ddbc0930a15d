//! End-to-end: raw failure → dispatcher → error value → localized text.

use std::sync::Arc;

use std::time::Duration;

use mishap_auth::{AuthErrorCode, AuthFailure, SessionError};
use mishap_core::{DomainError, ErrorCode, ErrorFamily, ErrorValue, ValidationFailure, ValidationRule};
use mishap_i18n::{resolve, Catalog, Locale, TemplateStore, TemplateTable};
use mishap_infra::{DatabaseFailure, Dispatcher, NetworkFailure, QueryError, RawFailure};
use mishap_observability::MemorySink;
use proptest::prelude::*;

fn dispatcher() -> (Dispatcher, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    (Dispatcher::new("profiles").with_sink(sink.clone()), sink)
}

#[test]
fn duplicate_username_reads_as_friendly_english() {
    let (d, sink) = dispatcher();
    let failure = QueryError::new(
        "23505",
        "duplicate key value violates unique constraint \"profiles_username_key\"",
    )
    .with_constraint("profiles_username_key");
    let result: Result<(), ErrorValue> = d.execute(|| Err(DatabaseFailure::from(failure).into()));

    let value = result.unwrap_err();
    assert_eq!(value.code(), ErrorCode::DatabaseUniqueConstraint);
    assert!(!value.is_retryable());

    let english = TemplateTable::bundled(Locale::En).unwrap();
    assert_eq!(resolve(&value, &english), "A record with this value already exists.");

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].boundary, "profiles");
    assert!(records[0].technical_message.contains("23505"));
}

#[test]
fn weak_password_from_provider_renders_policy() {
    let (d, _) = dispatcher();
    let failure = AuthFailure::new(AuthErrorCode::WeakPassword, "Password should be at least 8 characters")
        .with_status(422);
    let value = d.execute::<(), _>(|| Err(failure.into())).unwrap_err();
    let catalog = Catalog::bundled().unwrap();
    assert_eq!(
        catalog.resolve(&value, Some(Locale::En)),
        "Password too short, need 8 characters"
    );
}

#[test]
fn retryable_failures_surface_as_retryable() {
    let (d, _) = dispatcher();
    let failures: Vec<RawFailure> = vec![
        DatabaseFailure::PoolTimedOut.into(),
        DatabaseFailure::query("40P01", "deadlock detected").into(),
        NetworkFailure::status(502).into(),
        NetworkFailure::status(429).into(),
        AuthFailure::from_status(429, "Too many requests").into(),
    ];
    for failure in failures {
        let value = d.execute::<(), _>(|| Err(failure)).unwrap_err();
        assert!(value.is_retryable(), "{} should be retryable", value.code());
    }
}

#[test]
fn unmatched_discriminants_land_in_family_generic() {
    let (d, _) = dispatcher();
    let cases: Vec<(RawFailure, ErrorCode)> = vec![
        (DatabaseFailure::query("XX001", "data corrupted").into(), ErrorCode::DatabaseGeneric),
        (
            AuthFailure::new("mfa_verification_rejected", "MFA failed").with_status(403).into(),
            ErrorCode::AuthGeneric,
        ),
        (NetworkFailure::status(307).into(), ErrorCode::NetworkGeneric),
        (
            ValidationFailure::new(
                "sku",
                ValidationRule::Custom {
                    name: "sku_checksum".into(),
                    message: "bad checksum".into(),
                },
            )
            .into(),
            ErrorCode::ValidationGeneric,
        ),
        (
            DomainError::Unspecified {
                kind: "quota_policy".into(),
                message: "policy engine said no".into(),
            }
            .into(),
            ErrorCode::BusinessGeneric,
        ),
        (RawFailure::unknown(anyhow::anyhow!("boom")), ErrorCode::UnknownError),
    ];

    let catalog = Catalog::bundled().unwrap();
    for (failure, code) in cases {
        let value = d.execute::<(), _>(|| Err(failure)).unwrap_err();
        assert_eq!(value.code(), code);
        assert!(value.technical_detail().is_some(), "{code} lost its diagnostics");
        assert!(!catalog.resolve(&value, None).is_empty());
    }
}

#[test]
fn session_errors_map_through_auth() {
    let (d, _) = dispatcher();
    let value = d.execute::<(), _>(|| Err(SessionError::Expired.into())).unwrap_err();
    assert_eq!(value.family(), ErrorFamily::Auth);
    let spanish = TemplateTable::bundled(Locale::Es).unwrap();
    assert_eq!(
        resolve(&value, &spanish),
        "Tu sesión ha caducado. Inicia sesión de nuevo."
    );
}

/// One failure per discriminant each mapper matches on, plus an unmatched one per family.
fn every_mapper_input() -> Vec<RawFailure> {
    let mut failures: Vec<RawFailure> = Vec::new();

    let states = [
        "23505", "23503", "23502", "23514", "42501", "22P02", "22001", "22003", "22007", "40001",
        "40P01", "57014", "08000", "08001", "08003", "08006", "08P01", "08004", "53300", "57P01",
        "57P02", "57P03", "42P01", "42703", "PGRST116", "PGRST301", "PGRST303", "XX000",
    ];
    for state in states {
        failures.push(DatabaseFailure::query(state, "server message").into());
    }
    failures.extend(
        [
            DatabaseFailure::RowNotFound,
            DatabaseFailure::PoolTimedOut,
            DatabaseFailure::PoolClosed,
            DatabaseFailure::Io { message: "reset".into() },
            DatabaseFailure::Tls { message: "handshake".into() },
            DatabaseFailure::Protocol { message: "bad frame".into() },
            DatabaseFailure::Decode { message: "bad column".into() },
        ]
        .map(RawFailure::from),
    );

    let provider_codes = [
        AuthErrorCode::InvalidCredentials,
        AuthErrorCode::InvalidGrant,
        AuthErrorCode::UserAlreadyExists,
        AuthErrorCode::EmailExists,
        AuthErrorCode::PhoneExists,
        AuthErrorCode::WeakPassword,
        AuthErrorCode::EmailNotConfirmed,
        AuthErrorCode::PhoneNotConfirmed,
        AuthErrorCode::SessionExpired,
        AuthErrorCode::SessionNotFound,
        AuthErrorCode::RefreshTokenNotFound,
        AuthErrorCode::RefreshTokenAlreadyUsed,
        AuthErrorCode::BadJwt,
        AuthErrorCode::NoAuthorization,
        AuthErrorCode::UserNotFound,
        AuthErrorCode::OtpExpired,
        AuthErrorCode::SignupDisabled,
        AuthErrorCode::UserBanned,
        AuthErrorCode::OverRequestRateLimit,
        AuthErrorCode::OverEmailSendRateLimit,
        AuthErrorCode::OverSmsSendRateLimit,
        AuthErrorCode::Other("mfa_challenge_expired".into()),
    ];
    for code in provider_codes {
        failures.push(AuthFailure::new(code, "provider text").with_status(400).into());
    }
    for status in [401, 429, 422, 500] {
        failures.push(AuthFailure::from_status(status, "provider text").into());
    }
    failures.extend(
        [SessionError::Expired, SessionError::NotYetValid, SessionError::InvalidTimeWindow]
            .map(RawFailure::from),
    );

    failures.extend(
        [
            NetworkFailure::NoConnection { message: "offline".into() },
            NetworkFailure::DnsLookup { host: "api.internal".into() },
            NetworkFailure::ConnectionRefused { message: "refused".into() },
            NetworkFailure::Timeout { after: None },
            NetworkFailure::timeout(Duration::from_secs(5)),
            NetworkFailure::Tls { message: "expired cert".into() },
            NetworkFailure::InvalidResponse { message: "not json".into() },
            NetworkFailure::Unclassified {
                class: "socket".into(),
                message: "weird".into(),
            },
        ]
        .map(RawFailure::from),
    );
    for status in [302, 400, 401, 403, 404, 408, 409, 422, 429, 500, 502, 503, 504] {
        failures.push(NetworkFailure::status(status).into());
    }

    let rules = [
        ValidationRule::Required,
        ValidationRule::TooShort { min_length: 3 },
        ValidationRule::TooLong { max_length: 40 },
        ValidationRule::InvalidEmail,
        ValidationRule::InvalidFormat { expected: "sku".into() },
        ValidationRule::OutOfRange { min: 1, max: 99 },
        ValidationRule::Mismatch { other_field: "password".into() },
        ValidationRule::Custom {
            name: "sku_checksum".into(),
            message: "bad checksum".into(),
        },
    ];
    for rule in rules {
        failures.push(ValidationFailure::new("field", rule).into());
    }

    failures.extend(
        [
            DomainError::validation("bad"),
            DomainError::invalid_id("xyz"),
            DomainError::invariant("order already shipped"),
            DomainError::not_found("order"),
            DomainError::conflict("already paid"),
            DomainError::forbidden("not the owner"),
            DomainError::LimitExceeded {
                what: "projects".into(),
                limit: 5,
            },
            DomainError::Unspecified {
                kind: "quota_policy".into(),
                message: "policy engine said no".into(),
            },
        ]
        .map(RawFailure::from),
    );

    failures.push(RawFailure::unknown(anyhow::anyhow!("boom")));
    failures
}

#[test]
fn every_mapper_output_renders_in_every_bundled_locale() {
    let (d, _) = dispatcher();
    let tables: Vec<(Locale, TemplateTable)> = Locale::SUPPORTED
        .iter()
        .map(|&locale| (locale, TemplateTable::bundled(locale).unwrap()))
        .collect();

    for failure in every_mapper_input() {
        let description = format!("{failure:?}");
        let value = d.execute::<(), _>(|| Err(failure)).unwrap_err();
        for (locale, table) in &tables {
            let key = value.code().localization_key();
            assert!(
                table.template(&key).is_some(),
                "{locale} has no template for {key} ({description})"
            );
            let shown = resolve(&value, table);
            assert!(!shown.contains("[?"), "{locale}: {shown:?} from {description}");
            assert!(!shown.is_empty());
        }
    }
}

/// Failure shapes that can carry arbitrary provider text.
#[derive(Debug, Clone)]
enum Sample {
    Sql(String),
    SqlWithSchema(String),
    Status(u16),
    AuthCode(String),
    Unclassified,
    Missing,
    Invariant,
    Untyped,
}

impl Sample {
    fn into_failure(self, text: &str) -> RawFailure {
        match self {
            Sample::Sql(state) => DatabaseFailure::query(state.as_str(), text).into(),
            Sample::SqlWithSchema(state) => DatabaseFailure::from(
                QueryError::new(state.as_str(), text)
                    .with_detail(text)
                    .with_constraint(text)
                    .with_column(text),
            )
            .into(),
            Sample::Status(status) => NetworkFailure::HttpStatus {
                status,
                body: Some(text.to_string()),
            }
            .into(),
            Sample::AuthCode(code) => AuthFailure::new(code, text).into(),
            Sample::Unclassified => NetworkFailure::Unclassified {
                class: text.to_string(),
                message: text.to_string(),
            }
            .into(),
            Sample::Missing => DomainError::not_found(text).into(),
            Sample::Invariant => DomainError::invariant(text).into(),
            Sample::Untyped => RawFailure::unknown(anyhow::anyhow!("{text}")),
        }
    }
}

fn arb_sample() -> impl Strategy<Value = Sample> {
    prop_oneof![
        "[0-9A-Z]{5}".prop_map(Sample::Sql),
        prop_oneof![Just("23505"), Just("23502"), Just("23503"), Just("08004"), Just("XX000")]
            .prop_map(|state| Sample::SqlWithSchema(state.to_string())),
        (100u16..600).prop_map(Sample::Status),
        "[a-z_]{3,20}".prop_map(Sample::AuthCode),
        Just(Sample::Unclassified),
        Just(Sample::Missing),
        Just(Sample::Invariant),
        Just(Sample::Untyped),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    /// No raw failure text reaches the display string, in any locale.
    #[test]
    fn nothing_leaks_to_the_user(
        sample in arb_sample(),
        text in "LEAK[a-z0-9]{10}",
        locale_index in 0..Locale::SUPPORTED.len(),
    ) {
        let (d, _) = dispatcher();
        let value = d
            .execute::<(), _>(|| Err(sample.into_failure(&text)))
            .unwrap_err();
        let table = TemplateTable::bundled(Locale::SUPPORTED[locale_index]).unwrap();
        let shown = resolve(&value, &table);
        prop_assert!(!shown.contains("LEAK"), "leaked: {}", shown);
    }

    /// Re-dispatching a mapped value returns it unchanged and logs nothing new.
    #[test]
    fn dispatch_is_idempotent(status in 100u16..600, depth in 1usize..4) {
        let (d, sink) = dispatcher();
        let mut result = d.execute::<(), _>(|| Err(NetworkFailure::status(status).into()));
        for _ in 0..depth {
            let previous = result.clone();
            result = d.execute(|| previous.map_err(RawFailure::from));
        }
        let once = d.execute::<(), _>(|| Err(NetworkFailure::status(status).into()));
        prop_assert_eq!(result, once);
        prop_assert_eq!(sink.len(), 2);
    }
}
