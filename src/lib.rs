//! kvrepo - backend-agnostic key-value repositories.
//!
//! Higher-level services persist typed records through the [`repository::KeyValueRepo`]
//! contract without depending on a concrete storage technology.
//!
//! # Architecture
//!
//! The crate provides:
//! - `InMemoryRepo`, a process-local reference backend
//! - `CodecRepo`, a typed view over byte-valued (durable) backends
//! - `HashKeyRepo`, which derives storage keys from value content
//! - `RepoConfigManager`, a read-through configuration cache over any backend
//! - `PersistentDuplicationFilter`, which lets only unseen items through
//!
//! # Example
//!
//! ```
//! use kvrepo::configuration::{ConfigManager, ConfigProvider, RepoConfigManager};
//! use kvrepo::filter::{DuplicationFilter, PersistentDuplicationFilter};
//! use kvrepo::repository::InMemoryRepo;
//!
//! let config = RepoConfigManager::new(InMemoryRepo::<String>::new());
//! config.set_config("region", "eu-central-1".to_string()).unwrap();
//! assert_eq!(config.get_config("region").unwrap(), "eu-central-1");
//!
//! let filter = PersistentDuplicationFilter::new(InMemoryRepo::<&str>::new());
//! assert_eq!(filter.filter(vec!["a", "a", "b"]), vec!["a", "b"]);
//! assert!(filter.filter(vec!["a"]).is_empty());
//! ```

pub mod config;
pub mod configuration;
pub mod errors;
pub mod filter;
pub mod repository;

pub use errors::RepoError;

use crate::config::{LogConfig, LogFormat};

/// Configure structured logging from `KVREPO_LOG_FORMAT` and `KVREPO_LOG`.
///
/// JSON output is the default, suitable for `CloudWatch` Logs. Calling this
/// more than once, or after the host installed its own subscriber, is a no-op.
///
/// # Example
///
/// ```
/// kvrepo::setup_logging();
/// ```
pub fn setup_logging() {
    setup_logging_with(&LogConfig::from_env());
}

/// Same as [`setup_logging`] with explicit settings.
pub fn setup_logging_with(config: &LogConfig) {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_new(&config.filter).unwrap_or_else(|_| EnvFilter::new("info"));

    let result = match config.format {
        LogFormat::Json => {
            let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
        }
        LogFormat::Pretty => {
            let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
        }
    };

    // Err only means a subscriber is already installed; keep it.
    let _ = result;
}
