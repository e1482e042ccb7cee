use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

use super::{ConfigManager, ConfigProvider};
use crate::errors::RepoError;
use crate::repository::KeyValueRepo;

type Cache<V> = Option<HashMap<String, V>>;

/// Configuration stored in a [`KeyValueRepo`], read through a per-instance cache.
///
/// The first `get_config` loads the whole repository with one `find_all`.
/// Later reads are served from memory. `set_config` writes through with
/// `overwrite` and mirrors the value into the cache once the write succeeded.
///
/// Writes made to the repository by anything other than this instance are
/// not visible until [`reset_cache`](Self::reset_cache) is called.
pub struct RepoConfigManager<R: KeyValueRepo> {
    repo: R,
    cache: RwLock<Cache<R::Value>>,
}

impl<R> RepoConfigManager<R>
where
    R: KeyValueRepo,
    R::Value: Clone,
{
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            cache: RwLock::new(None),
        }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Discards the cache; the next read repopulates it with a fresh scan.
    pub fn reset_cache(&self) {
        *self.write_cache() = None;
        info!("Configuration cache reset");
    }

    #[must_use]
    pub fn is_cache_populated(&self) -> bool {
        self.read_cache().is_some()
    }

    fn lookup(cache: &HashMap<String, R::Value>, key: &str) -> Result<R::Value, RepoError> {
        if let Some(value) = cache.get(key) {
            return Ok(value.clone());
        }

        let mut cached: Vec<&str> = cache.keys().map(String::as_str).collect();
        cached.sort_unstable();
        debug!("Configuration key '{}' not found, cached keys: {:?}", key, cached);

        Err(RepoError::NotFound(key.to_string()))
    }

    fn populate(&self, cache: &mut Cache<R::Value>) -> Result<(), RepoError> {
        let records = self.repo.find_all()?;
        let loaded: HashMap<String, R::Value> = records
            .into_iter()
            .map(|record| (record.key, record.value))
            .collect();
        debug!("Configuration cache populated with {} entries", loaded.len());
        *cache = Some(loaded);
        Ok(())
    }

    fn read_cache(&self) -> RwLockReadGuard<'_, Cache<R::Value>> {
        self.cache.read().unwrap_or_else(|poisoned| {
            warn!("RepoConfigManager lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn write_cache(&self) -> RwLockWriteGuard<'_, Cache<R::Value>> {
        self.cache.write().unwrap_or_else(|poisoned| {
            warn!("RepoConfigManager lock poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

impl<R> ConfigProvider for RepoConfigManager<R>
where
    R: KeyValueRepo,
    R::Value: Clone,
{
    type Value = R::Value;

    fn get_config(&self, key: &str) -> Result<R::Value, RepoError> {
        {
            let cache = self.read_cache();
            if let Some(loaded) = cache.as_ref() {
                return Self::lookup(loaded, key);
            }
        }

        let mut cache = self.write_cache();
        // Another reader may have populated the cache while we waited.
        if cache.is_none() {
            self.populate(&mut cache)?;
        }
        match cache.as_ref() {
            Some(loaded) => Self::lookup(loaded, key),
            None => Err(RepoError::NotFound(key.to_string())),
        }
    }
}

impl<R> ConfigManager for RepoConfigManager<R>
where
    R: KeyValueRepo,
    R::Value: Clone,
{
    fn set_config(&self, key: &str, value: R::Value) -> Result<(), RepoError> {
        // Held across the write so a concurrent population cannot miss it.
        let mut cache = self.write_cache();
        let record = self.repo.overwrite(key, value)?;
        if let Some(loaded) = cache.as_mut() {
            loaded.insert(record.key, record.value);
        }
        Ok(())
    }
}
