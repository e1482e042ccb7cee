//! Key-value repositories
//!
//! Every backend implements [`KeyValueRepo`]. Decorators such as
//! [`HashKeyRepo`] and [`crate::configuration::RepoConfigManager`] wrap any
//! backend through that contract and never depend on a concrete store.

use std::sync::Arc;

use crate::errors::RepoError;

pub mod codec;
pub mod hash_key;
pub mod in_memory;

pub use codec::{Codec, CodecRepo, JsonCodec, TextCodec};
pub use hash_key::{HashKeyRepo, to_key};
pub use in_memory::InMemoryRepo;

/// A stored value together with the key it is stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<V> {
    pub key: String,
    pub value: V,
}

impl<V> Record<V> {
    pub fn new(key: impl Into<String>, value: V) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Storage contract shared by all backends.
///
/// Key uniqueness is part of the contract: `save` must refuse an existing
/// key while `overwrite` replaces it. Implementations are shared between
/// threads, so every operation takes `&self` and synchronizes internally.
pub trait KeyValueRepo: Send + Sync {
    type Value;

    /// Returns every stored record. Ordering is unspecified.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Backend`] if the store cannot be scanned.
    fn find_all(&self) -> Result<Vec<Record<Self::Value>>, RepoError>;

    /// Inserts a new record.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::AlreadyExists`] if `key` is already stored; the
    /// existing record is left untouched.
    fn save(&self, key: &str, value: Self::Value) -> Result<Record<Self::Value>, RepoError>;

    /// Inserts or replaces the record stored under `key`.
    ///
    /// # Errors
    ///
    /// Only fails when the backend itself fails.
    fn overwrite(&self, key: &str, value: Self::Value) -> Result<Record<Self::Value>, RepoError>;

    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] if `key` is not stored.
    fn delete(&self, key: &str) -> Result<(), RepoError>;

    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] if `key` is not stored.
    fn find(&self, key: &str) -> Result<Record<Self::Value>, RepoError>;
}

impl<R: KeyValueRepo + ?Sized> KeyValueRepo for &R {
    type Value = R::Value;

    fn find_all(&self) -> Result<Vec<Record<Self::Value>>, RepoError> {
        (**self).find_all()
    }

    fn save(&self, key: &str, value: Self::Value) -> Result<Record<Self::Value>, RepoError> {
        (**self).save(key, value)
    }

    fn overwrite(
        &self,
        key: &str,
        value: Self::Value,
    ) -> Result<Record<Self::Value>, RepoError> {
        (**self).overwrite(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), RepoError> {
        (**self).delete(key)
    }

    fn find(&self, key: &str) -> Result<Record<Self::Value>, RepoError> {
        (**self).find(key)
    }
}

impl<R: KeyValueRepo + ?Sized> KeyValueRepo for Arc<R> {
    type Value = R::Value;

    fn find_all(&self) -> Result<Vec<Record<Self::Value>>, RepoError> {
        (**self).find_all()
    }

    fn save(&self, key: &str, value: Self::Value) -> Result<Record<Self::Value>, RepoError> {
        (**self).save(key, value)
    }

    fn overwrite(
        &self,
        key: &str,
        value: Self::Value,
    ) -> Result<Record<Self::Value>, RepoError> {
        (**self).overwrite(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), RepoError> {
        (**self).delete(key)
    }

    fn find(&self, key: &str) -> Result<Record<Self::Value>, RepoError> {
        (**self).find(key)
    }
}
