//! Startup check that a table covers the whole error registry.

use mishap_core::ErrorCode;

use crate::error::LocalizationError;
use crate::locale::Locale;
use crate::store::TemplateStore;

/// Codes whose localization key has no template in `store`, in registry order.
pub fn missing_keys<S>(store: &S) -> Vec<ErrorCode>
where
    S: TemplateStore + ?Sized,
{
    ErrorCode::ALL
        .iter()
        .copied()
        .filter(|code| store.template(&code.localization_key()).is_none())
        .collect()
}

pub fn validate<S>(store: &S, locale: Locale) -> Result<(), LocalizationError>
where
    S: TemplateStore + ?Sized,
{
    let missing = missing_keys(store);
    if missing.is_empty() {
        return Ok(());
    }
    Err(LocalizationError::MissingTemplates {
        locale,
        keys: missing.iter().map(|code| code.localization_key()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use crate::store::TemplateTable;

    use super::*;

    #[test]
    fn empty_table_misses_everything() {
        let table = TemplateTable::new();
        assert_eq!(missing_keys(&table).len(), ErrorCode::ALL.len());
    }

    #[test]
    fn bundled_tables_are_complete() {
        for locale in Locale::SUPPORTED {
            let table = TemplateTable::bundled(*locale).unwrap();
            assert_eq!(missing_keys(&table), Vec::<ErrorCode>::new(), "{locale}");
            validate(&table, *locale).unwrap();
        }
    }

    #[test]
    fn validation_names_missing_keys() {
        let table: TemplateTable = ErrorCode::ALL
            .iter()
            .filter(|code| **code != ErrorCode::NetworkTimeout)
            .map(|code| (code.localization_key(), "x".to_string()))
            .collect();
        let err = validate(&table, Locale::Es).unwrap_err();
        match err {
            LocalizationError::MissingTemplates { locale, keys } => {
                assert_eq!(locale, Locale::Es);
                assert_eq!(keys, vec!["error.network_timeout".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
