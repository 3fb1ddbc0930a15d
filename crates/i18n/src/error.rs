use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::locale::Locale;

#[derive(Debug, Error)]
pub enum LocalizationError {
    #[error("cannot read templates from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid template table {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported locale: {0}")]
    UnsupportedLocale(String),

    /// Startup coverage check failed.
    #[error("locale {locale} is missing {} template(s): {}", .keys.len(), .keys.join(", "))]
    MissingTemplates { locale: Locale, keys: Vec<String> },
}
