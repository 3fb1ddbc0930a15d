use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LocalizationError;

/// Locales with a bundled template table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
}

impl Locale {
    pub const SUPPORTED: &'static [Locale] = &[Locale::En, Locale::Es];

    pub fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Es => "es",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts a bare language (`es`) or a language tag with region (`es-MX`, `en_US`).
impl FromStr for Locale {
    type Err = LocalizationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let language = s
            .trim()
            .split(['-', '_', '.'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match language.as_str() {
            "en" => Ok(Locale::En),
            "es" => Ok(Locale::Es),
            _ => Err(LocalizationError::UnsupportedLocale(s.to_string())),
        }
    }
}
