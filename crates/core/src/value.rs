//! The error value that crosses every boundary above the data/auth layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::code::{ErrorCode, ErrorFamily, Severity};
use crate::record::FailureRecord;
use crate::template::{render, GENERIC_FALLBACK_MESSAGE};

/// Immutable, structured description of a mapped failure.
///
/// Built exactly once, at the point a raw failure is mapped. Fields are private and
/// the `with_*` builders consume `self`, so a value cannot change after it has been
/// handed to another layer.
///
/// `technical_message` and `technical_detail` are for logs only and never reach
/// the display string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(from = "ErrorValueFields")]
#[error("[{code}] {technical_message}")]
pub struct ErrorValue {
    code: ErrorCode,
    technical_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    technical_detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    params: Option<BTreeMap<String, String>>,
}

/// Wire shape of [`ErrorValue`]; deserialization goes through [`ErrorValue::new`].
#[derive(Deserialize)]
struct ErrorValueFields {
    code: ErrorCode,
    technical_message: String,
    #[serde(default)]
    technical_detail: Option<String>,
    #[serde(default)]
    params: Option<BTreeMap<String, String>>,
}

impl From<ErrorValueFields> for ErrorValue {
    fn from(fields: ErrorValueFields) -> Self {
        let value = ErrorValue::new(fields.code, fields.technical_message)
            .with_optional_detail(fields.technical_detail);
        match fields.params {
            Some(params) => value.with_params(params),
            None => value,
        }
    }
}

impl ErrorValue {
    /// Create a value for `code`.
    ///
    /// An empty `technical_message` is replaced by `unspecified <code> failure` so
    /// logs always carry something searchable.
    pub fn new(code: ErrorCode, technical_message: impl Into<String>) -> Self {
        let mut technical_message = technical_message.into();
        if technical_message.trim().is_empty() {
            technical_message = format!("unspecified {code} failure");
        }
        Self {
            code,
            technical_message,
            technical_detail: None,
            params: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.technical_detail = Some(detail.into());
        self
    }

    /// Attach a detail only when one is available.
    pub fn with_optional_detail(mut self, detail: Option<impl Into<String>>) -> Self {
        self.technical_detail = detail.map(Into::into);
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.to_string());
        self
    }

    pub fn with_params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: ToString,
    {
        let map = self.params.get_or_insert_with(BTreeMap::new);
        for (k, v) in params {
            map.insert(k.into(), v.to_string());
        }
        if map.is_empty() {
            self.params = None;
        }
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn technical_message(&self) -> &str {
        &self.technical_message
    }

    pub fn technical_detail(&self) -> Option<&str> {
        self.technical_detail.as_deref()
    }

    pub fn params(&self) -> Option<&BTreeMap<String, String>> {
        self.params.as_ref()
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.as_ref()?.get(name).map(String::as_str)
    }

    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    pub fn family(&self) -> ErrorFamily {
        self.code.family()
    }

    /// Resolve the user-facing message through `template_lookup`.
    ///
    /// The lookup receives `code.localization_key()`. When it has no template the
    /// fixed [`GENERIC_FALLBACK_MESSAGE`] is returned; the raw key is never shown.
    pub fn get_display_message<F>(&self, template_lookup: F) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = self.code.localization_key();
        match template_lookup(&key) {
            Some(template) => render(&template, self.params.as_ref()),
            None => {
                tracing::warn!(code = %self.code, key = %key, "missing translation template");
                GENERIC_FALLBACK_MESSAGE.to_string()
            }
        }
    }

    /// Structured record for the logging collaborator.
    pub fn record(&self, boundary: &str) -> FailureRecord {
        FailureRecord::from_value(self, boundary)
    }
}
