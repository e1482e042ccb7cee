//! Configuration access
//!
//! - [`EnvConfigProvider`] reads process environment variables.
//! - [`RepoConfigManager`] reads and writes configuration stored in any
//!   [`crate::repository::KeyValueRepo`], served from a read-through cache.

use crate::errors::RepoError;

pub mod env;
pub mod repo_config;

pub use env::EnvConfigProvider;
pub use repo_config::RepoConfigManager;

/// Read-only access to configuration values.
pub trait ConfigProvider {
    type Value;

    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] if no value is configured for `key`.
    fn get_config(&self, key: &str) -> Result<Self::Value, RepoError>;
}

/// Configuration access that can also persist values.
pub trait ConfigManager: ConfigProvider {
    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns the error of the underlying store if the write fails.
    fn set_config(&self, key: &str, value: Self::Value) -> Result<(), RepoError>;
}
