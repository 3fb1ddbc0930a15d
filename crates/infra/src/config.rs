//! Mapper configuration, read from the environment.

use mishap_auth::DEFAULT_MIN_PASSWORD_LENGTH;

pub const MIN_PASSWORD_LENGTH_VAR: &str = "MISHAP_MIN_PASSWORD_LENGTH";

/// Tunables for the built-in mappers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapperConfig {
    /// Reported as `min_length` for weak-password failures when the auth provider
    /// does not say.
    pub min_password_length: u32,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
        }
    }
}

impl MapperConfig {
    /// Read `MISHAP_MIN_PASSWORD_LENGTH`; invalid values fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests, embedded config maps).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = lookup(MIN_PASSWORD_LENGTH_VAR) {
            match raw.trim().parse::<u32>() {
                Ok(len) if len > 0 => config.min_password_length = len,
                _ => tracing::warn!(
                    value = %raw,
                    "{MIN_PASSWORD_LENGTH_VAR} is not a positive integer; using {}",
                    config.min_password_length
                ),
            }
        }
        config
    }
}
