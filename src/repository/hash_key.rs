use sha2::{Digest, Sha256};
use std::fmt::Debug;
use uuid::Uuid;

use super::{KeyValueRepo, Record};
use crate::errors::RepoError;

/// Derives a storage key from the content of `value`.
///
/// The value is rendered with its `Debug` representation, hashed with SHA-256
/// and the first 16 digest bytes are formatted as a hyphenated UUID. Values
/// with identical renderings always map to the same key. Types whose `Debug`
/// output is not stable (e.g. `HashMap`) do not get stable keys.
#[must_use]
pub fn to_key<T: Debug + ?Sized>(value: &T) -> String {
    let digest = Sha256::digest(format!("{value:?}").as_bytes());
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    Uuid::from_bytes(bytes).hyphenated().to_string()
}

/// Content-addressing decorator over any [`KeyValueRepo`].
///
/// Callers never choose keys for inserts; `save` and `overwrite` store the
/// value under [`to_key`] of itself. Reads pass through unchanged.
#[derive(Debug)]
pub struct HashKeyRepo<R> {
    inner: R,
}

impl<R> HashKeyRepo<R>
where
    R: KeyValueRepo,
    R::Value: Debug,
{
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// # Errors
    ///
    /// Returns [`RepoError::AlreadyExists`] if an equal value is already stored.
    pub fn save(&self, value: R::Value) -> Result<Record<R::Value>, RepoError> {
        let key = to_key(&value);
        self.inner.save(&key, value)
    }

    /// # Errors
    ///
    /// Forwards any error from the wrapped backend.
    pub fn overwrite(&self, value: R::Value) -> Result<Record<R::Value>, RepoError> {
        let key = to_key(&value);
        self.inner.overwrite(&key, value)
    }

    /// # Errors
    ///
    /// Forwards any error from the wrapped backend.
    pub fn find_all(&self) -> Result<Vec<Record<R::Value>>, RepoError> {
        self.inner.find_all()
    }

    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] if nothing is stored under `key`.
    pub fn find(&self, key: &str) -> Result<Record<R::Value>, RepoError> {
        self.inner.find(key)
    }

    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] if nothing is stored under `key`.
    pub fn delete(&self, key: &str) -> Result<(), RepoError> {
        self.inner.delete(key)
    }

    /// Number of stored records. Runs a full scan, O(n) in the store size.
    ///
    /// # Errors
    ///
    /// Forwards any error from the scan.
    pub fn count(&self) -> Result<usize, RepoError> {
        Ok(self.inner.find_all()?.len())
    }

    /// True iff a record is stored under `key`. Any lookup failure counts as absent.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.inner.find(key).is_ok()
    }

    #[must_use]
    pub fn contains_value(&self, value: &R::Value) -> bool {
        self.contains(&to_key(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryRepo;

    #[derive(Debug)]
    struct Probe {
        test: &'static str,
    }

    #[test]
    fn equal_renderings_share_a_key() {
        let a = to_key(&Probe { test: "dummy" });
        let b = to_key(&Probe { test: "dummy" });
        assert_eq!(a, b);
    }

    #[test]
    fn different_renderings_get_different_keys() {
        let a = to_key(&Probe { test: "dummy" });
        let b = to_key(&Probe { test: "dummie" });
        assert_ne!(a, b);
    }

    #[test]
    fn key_is_uuid_shaped() {
        let key = to_key("a");
        assert_eq!(key.len(), 36);
        assert!(Uuid::parse_str(&key).is_ok());
    }

    #[test]
    fn save_stores_under_content_key() {
        let repo = HashKeyRepo::new(InMemoryRepo::<String>::new());
        let record = repo.save("a".to_string()).unwrap();

        assert_eq!(record.key, to_key(&"a".to_string()));
        assert!(repo.contains(&record.key));
        assert!(repo.contains_value(&"a".to_string()));
        assert!(!repo.contains_value(&"b".to_string()));
    }

    #[test]
    fn save_of_equal_content_is_rejected() {
        let repo = HashKeyRepo::new(InMemoryRepo::<u32>::new());
        repo.save(42_u32).unwrap();
        assert!(repo.save(42_u32).unwrap_err().is_already_exists());
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn overwrite_of_equal_content_succeeds() {
        let repo = HashKeyRepo::new(InMemoryRepo::<String>::new());
        repo.overwrite("a".to_string()).unwrap();
        repo.overwrite("a".to_string()).unwrap();

        assert!(repo.contains_value(&"a".to_string()));
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn delete_passes_through() {
        let repo = HashKeyRepo::new(InMemoryRepo::<String>::new());
        let record = repo.save("x".to_string()).unwrap();

        repo.delete(&record.key).unwrap();
        assert!(!repo.contains(&record.key));
        assert!(repo.find(&record.key).unwrap_err().is_not_found());
        assert_eq!(repo.count().unwrap(), 0);
    }
}
