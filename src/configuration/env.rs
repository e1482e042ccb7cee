use std::env;
use tracing::warn;

use super::ConfigProvider;
use crate::errors::RepoError;

/// Reads configuration from process environment variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvConfigProvider;

impl EnvConfigProvider {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Returns the variable's value, which may be empty, or `None` if it is
    /// unset, not valid unicode, or `key` is not a legal variable name.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<String> {
        if key.is_empty() || key.contains(['=', '\0']) {
            return None;
        }
        env::var(key).ok()
    }

    /// Same as [`lookup`](Self::lookup) but logs a warning when the variable is missing.
    #[must_use]
    pub fn verbose_lookup(&self, key: &str) -> Option<String> {
        let value = self.lookup(key);
        if value.is_none() {
            warn!("Could not find configuration for key '{}'", key);
        }
        value
    }
}

impl ConfigProvider for EnvConfigProvider {
    type Value = String;

    fn get_config(&self, key: &str) -> Result<String, RepoError> {
        self.lookup(key)
            .ok_or_else(|| RepoError::NotFound(key.to_string()))
    }
}
