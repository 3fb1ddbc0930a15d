//! Localization settings, read from the environment.

use std::path::PathBuf;

use crate::locale::Locale;

pub const LOCALE_VAR: &str = "MISHAP_LOCALE";
pub const TEMPLATE_DIR_VAR: &str = "MISHAP_TEMPLATE_DIR";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalizationConfig {
    /// Locale used when the caller does not pick one.
    pub default_locale: Locale,
    /// Directory of `<locale>.json` files overriding bundled entries.
    pub template_dir: Option<PathBuf>,
}

impl LocalizationConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// An unsupported `MISHAP_LOCALE` logs a warning and keeps the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = lookup(LOCALE_VAR) {
            match raw.parse::<Locale>() {
                Ok(locale) => config.default_locale = locale,
                Err(err) => tracing::warn!(
                    error = %err,
                    "{LOCALE_VAR} ignored; using {}",
                    config.default_locale
                ),
            }
        }
        config.template_dir = lookup(TEMPLATE_DIR_VAR)
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);
        config
    }
}
