//! All locale tables for a process.
//!
//! Built once at startup, then shared read-only:
//!
//! ```text
//! bundled en.json / es.json
//!   ↓ overlay <template_dir>/<locale>.json (if present)
//!   ↓ coverage check against the error registry
//! Catalog
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use mishap_core::ErrorValue;

use crate::config::LocalizationConfig;
use crate::coverage;
use crate::error::LocalizationError;
use crate::locale::Locale;
use crate::resolve::resolve;
use crate::store::TemplateTable;

#[derive(Debug, Clone)]
pub struct Catalog {
    default_locale: Locale,
    tables: BTreeMap<Locale, TemplateTable>,
}

impl Catalog {
    /// Bundled tables for every supported locale, defaulting to English.
    pub fn bundled() -> Result<Self, LocalizationError> {
        let tables: BTreeMap<Locale, TemplateTable> = Locale::SUPPORTED
            .iter()
            .map(|locale| Ok((*locale, TemplateTable::bundled(*locale)?)))
            .collect::<Result<_, LocalizationError>>()?;
        Ok(Self {
            default_locale: Locale::default(),
            tables,
        })
    }

    /// Bundled tables, overridden from `config.template_dir`, then validated.
    pub fn from_config(config: &LocalizationConfig) -> Result<Self, LocalizationError> {
        let mut catalog = Self::bundled()?.with_default_locale(config.default_locale);
        if let Some(dir) = &config.template_dir {
            catalog.overlay_dir(dir)?;
        }
        catalog.validate()?;
        tracing::info!(
            default_locale = %catalog.default_locale,
            locales = catalog.tables.len(),
            "localization catalog loaded"
        );
        Ok(catalog)
    }

    pub fn with_default_locale(mut self, locale: Locale) -> Self {
        self.default_locale = locale;
        self
    }

    /// Overlay `<dir>/<locale>.json` onto each supported locale. Absent files are skipped.
    pub fn overlay_dir(&mut self, dir: &Path) -> Result<(), LocalizationError> {
        for locale in Locale::SUPPORTED {
            let path = dir.join(format!("{locale}.json"));
            if !path.is_file() {
                tracing::debug!(path = %path.display(), "no template override");
                continue;
            }
            let overrides = TemplateTable::from_file(&path)?;
            tracing::debug!(
                path = %path.display(),
                entries = overrides.len(),
                "applying template overrides"
            );
            self.tables.entry(*locale).or_default().overlay(overrides);
        }
        Ok(())
    }

    /// Fails on the first locale that lacks a template for any registered code.
    pub fn validate(&self) -> Result<(), LocalizationError> {
        self.tables
            .iter()
            .try_for_each(|(locale, table)| coverage::validate(table, *locale))
    }

    pub fn default_locale(&self) -> Locale {
        self.default_locale
    }

    pub fn table(&self, locale: Locale) -> Option<&TemplateTable> {
        self.tables.get(&locale)
    }

    /// Resolve in `locale`, or in the default locale when `None`.
    pub fn resolve(&self, value: &ErrorValue, locale: Option<Locale>) -> String {
        let locale = locale.unwrap_or(self.default_locale);
        match self.tables.get(&locale) {
            Some(table) => resolve(value, table),
            None => resolve(value, &TemplateTable::new()),
        }
    }
}
