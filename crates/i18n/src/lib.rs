//! Localization of error values.
//!
//! Templates are flat JSON tables (`"error.<code>": "text with {param}"`), one per
//! locale. English and Spanish tables are bundled; a directory of `<locale>.json`
//! files can override individual entries at startup.

pub mod catalog;
pub mod config;
pub mod coverage;
pub mod error;
pub mod locale;
pub mod resolve;
pub mod store;

pub use catalog::Catalog;
pub use config::LocalizationConfig;
pub use coverage::{missing_keys, validate};
pub use error::LocalizationError;
pub use locale::Locale;
pub use resolve::resolve;
pub use store::{TemplateStore, TemplateTable};
