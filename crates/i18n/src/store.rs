//! Template storage.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use crate::error::LocalizationError;
use crate::locale::Locale;

const EN: &str = include_str!("../locales/en.json");
const ES: &str = include_str!("../locales/es.json");

/// Read-only lookup from localization key to template.
///
/// Stores are shared across threads for the lifetime of the process.
pub trait TemplateStore: Send + Sync {
    fn template(&self, key: &str) -> Option<&str>;
}

impl TemplateStore for HashMap<String, String> {
    fn template(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl TemplateStore for BTreeMap<String, String> {
    fn template(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

/// One locale's templates, as loaded from a flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateTable {
    entries: BTreeMap<String, String>,
}

impl TemplateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The table compiled into the crate for `locale`.
    pub fn bundled(locale: Locale) -> Result<Self, LocalizationError> {
        let source = match locale {
            Locale::En => EN,
            Locale::Es => ES,
        };
        Self::from_json_str(source, &format!("bundled {locale}"))
    }

    /// `origin` names the source in parse errors.
    pub fn from_json_str(json: &str, origin: &str) -> Result<Self, LocalizationError> {
        let entries = serde_json::from_str(json).map_err(|source| LocalizationError::Parse {
            origin: origin.to_string(),
            source,
        })?;
        Ok(Self { entries })
    }

    pub fn from_file(path: &Path) -> Result<Self, LocalizationError> {
        let json = fs::read_to_string(path).map_err(|source| LocalizationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json, &path.display().to_string())
    }

    /// Entries in `other` replace entries here; everything else is kept.
    pub fn overlay(&mut self, other: TemplateTable) {
        self.entries.extend(other.entries);
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TemplateStore for TemplateTable {
    fn template(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TemplateTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
