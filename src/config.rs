use tracing::warn;

use crate::configuration::{ConfigProvider, EnvConfigProvider};
use crate::errors::RepoError;

pub const LOG_FORMAT_VAR: &str = "KVREPO_LOG_FORMAT";
pub const LOG_FILTER_VAR: &str = "KVREPO_LOG";
const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl LogFormat {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "pretty" | "text" | "plain" => Some(Self::Pretty),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            filter: DEFAULT_FILTER.to_string(),
        }
    }
}

impl LogConfig {
    /// Reads logging settings from the process environment. Unset or
    /// unrecognized values fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_provider(&EnvConfigProvider::new()).unwrap_or_else(|err| {
            warn!("Failed to read logging configuration, using defaults: {}", err);
            Self::default()
        })
    }

    /// Reads logging settings from any string-valued provider. Missing or
    /// unrecognized values fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns any provider error other than [`RepoError::NotFound`].
    pub fn from_provider<P: ConfigProvider<Value = String>>(provider: &P) -> Result<Self, RepoError> {
        let format = optional(provider, LOG_FORMAT_VAR)?
            .and_then(|raw| LogFormat::parse(&raw))
            .unwrap_or_default();
        let filter = optional(provider, LOG_FILTER_VAR)?
            .filter(|raw| !raw.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FILTER.to_string());

        Ok(Self { format, filter })
    }
}

fn optional<P: ConfigProvider<Value = String>>(
    provider: &P,
    key: &str,
) -> Result<Option<String>, RepoError> {
    match provider.get_config(key) {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_not_found() => Ok(None),
        Err(err) => Err(err),
    }
}
