#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use kvrepo::RepoError;
use kvrepo::repository::{InMemoryRepo, KeyValueRepo, Record};

/// In-memory backend that counts scans and can be told to fail.
pub struct FlakyRepo<V> {
    inner: InMemoryRepo<V>,
    scans: AtomicUsize,
    fail_scans: AtomicBool,
    fail_writes: AtomicBool,
}

impl<V: Clone + Send + Sync> FlakyRepo<V> {
    pub fn new() -> Self {
        Self {
            inner: InMemoryRepo::new(),
            scans: AtomicUsize::new(0),
            fail_scans: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn scans(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }

    pub fn fail_scans(&self, fail: bool) {
        self.fail_scans.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_write(&self) -> Result<(), RepoError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepoError::Backend("write rejected".to_string()));
        }
        Ok(())
    }
}

impl<V: Clone + Send + Sync> KeyValueRepo for FlakyRepo<V> {
    type Value = V;

    fn find_all(&self) -> Result<Vec<Record<V>>, RepoError> {
        self.scans.fetch_add(1, Ordering::SeqCst);
        if self.fail_scans.load(Ordering::SeqCst) {
            return Err(RepoError::Backend("scan failed".to_string()));
        }
        self.inner.find_all()
    }

    fn save(&self, key: &str, value: V) -> Result<Record<V>, RepoError> {
        self.check_write()?;
        self.inner.save(key, value)
    }

    fn overwrite(&self, key: &str, value: V) -> Result<Record<V>, RepoError> {
        self.check_write()?;
        self.inner.overwrite(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), RepoError> {
        self.check_write()?;
        self.inner.delete(key)
    }

    fn find(&self, key: &str) -> Result<Record<V>, RepoError> {
        self.inner.find(key)
    }
}
