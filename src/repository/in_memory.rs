//! Process-local backend kept entirely in memory.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::warn;

use super::{KeyValueRepo, Record};
use crate::errors::RepoError;

/// In-memory repository guarded by a single reader/writer lock.
///
/// Lookups and scans share the lock; `save`, `overwrite` and `delete` hold it
/// exclusively. Nothing survives the instance being dropped.
#[derive(Debug)]
pub struct InMemoryRepo<V> {
    store: RwLock<HashMap<String, V>>,
}

impl<V> InMemoryRepo<V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }

    /// Create a repository pre-populated with records. Later duplicates of a
    /// key replace earlier ones.
    pub fn with_records(records: impl IntoIterator<Item = Record<V>>) -> Self {
        let store = records
            .into_iter()
            .map(|record| (record.key, record.value))
            .collect();
        Self {
            store: RwLock::new(store),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, V>> {
        self.store.read().unwrap_or_else(|poisoned| {
            warn!("InMemoryRepo lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, V>> {
        self.store.write().unwrap_or_else(|poisoned| {
            warn!("InMemoryRepo lock poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

impl<V> Default for InMemoryRepo<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send + Sync> KeyValueRepo for InMemoryRepo<V> {
    type Value = V;

    fn find_all(&self) -> Result<Vec<Record<V>>, RepoError> {
        Ok(self
            .read()
            .iter()
            .map(|(key, value)| Record::new(key.clone(), value.clone()))
            .collect())
    }

    fn save(&self, key: &str, value: V) -> Result<Record<V>, RepoError> {
        let mut store = self.write();
        if store.contains_key(key) {
            return Err(RepoError::AlreadyExists(key.to_string()));
        }
        store.insert(key.to_string(), value.clone());
        Ok(Record::new(key, value))
    }

    fn overwrite(&self, key: &str, value: V) -> Result<Record<V>, RepoError> {
        self.write().insert(key.to_string(), value.clone());
        Ok(Record::new(key, value))
    }

    fn delete(&self, key: &str) -> Result<(), RepoError> {
        match self.write().remove(key) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound(key.to_string())),
        }
    }

    fn find(&self, key: &str) -> Result<Record<V>, RepoError> {
        self.read()
            .get(key)
            .map(|value| Record::new(key, value.clone()))
            .ok_or_else(|| RepoError::NotFound(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_on_empty_repo_is_not_found() {
        let repo: InMemoryRepo<String> = InMemoryRepo::new();
        assert_eq!(
            repo.find("a"),
            Err(RepoError::NotFound("a".to_string()))
        );
        assert!(repo.is_empty());
    }

    #[test]
    fn save_rejects_existing_key_and_keeps_first_value() {
        let repo = InMemoryRepo::new();
        repo.save("a", "x".to_string()).unwrap();

        let err = repo.save("a", "y".to_string()).unwrap_err();
        assert!(err.is_already_exists());
        assert_eq!(repo.find("a").unwrap().value, "x");
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn overwrite_replaces_value() {
        let repo = InMemoryRepo::new();
        repo.save("a", 1).unwrap();
        let record = repo.overwrite("a", 2).unwrap();

        assert_eq!(record, Record::new("a", 2));
        assert_eq!(repo.find("a").unwrap(), Record::new("a", 2));
    }

    #[test]
    fn overwrite_inserts_missing_key() {
        let repo = InMemoryRepo::new();
        repo.overwrite("fresh", 7).unwrap();
        assert_eq!(repo.find("fresh").unwrap().value, 7);
    }

    #[test]
    fn delete_twice_reports_not_found() {
        let repo = InMemoryRepo::new();
        repo.save("a", ()).unwrap();

        assert!(repo.delete("a").is_ok());
        assert!(repo.delete("a").unwrap_err().is_not_found());
        assert!(repo.find("a").unwrap_err().is_not_found());
    }

    #[test]
    fn find_all_is_a_snapshot() {
        let repo = InMemoryRepo::new();
        repo.save("a", 1).unwrap();
        repo.save("b", 2).unwrap();

        let mut snapshot = repo.find_all().unwrap();
        repo.save("c", 3).unwrap();

        snapshot.sort_by(|l, r| l.key.cmp(&r.key));
        assert_eq!(snapshot, vec![Record::new("a", 1), Record::new("b", 2)]);
        assert_eq!(repo.find_all().unwrap().len(), 3);
    }

    #[test]
    fn with_records_prepopulates() {
        let repo = InMemoryRepo::with_records(vec![
            Record::new("a", "1"),
            Record::new("b", "2"),
            Record::new("a", "3"),
        ]);

        assert_eq!(repo.len(), 2);
        assert_eq!(repo.find("a").unwrap().value, "3");
    }

    #[test]
    fn empty_key_is_a_regular_key() {
        let repo = InMemoryRepo::new();
        repo.save("", "empty").unwrap();
        assert_eq!(repo.find("").unwrap().value, "empty");
    }
}
