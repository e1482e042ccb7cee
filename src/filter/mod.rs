//! Duplicate filtering backed by a content-addressed repository.

use std::fmt::Debug;
use tracing::warn;

use crate::errors::RepoError;
use crate::repository::{HashKeyRepo, KeyValueRepo, to_key};

/// Returns the items of a batch that have not been seen before.
pub trait DuplicationFilter {
    type Item;

    fn filter(&self, items: Vec<Self::Item>) -> Vec<Self::Item>;
}

type PersistObserver<V> = Box<dyn Fn(&V, &RepoError) + Send + Sync>;

/// Remembers every item it lets through by saving it in a [`HashKeyRepo`].
///
/// Items are checked and persisted one at a time in input order, so
/// duplicates inside a single batch are reduced to their first occurrence.
///
/// A failed save does not change the result: the item is still returned and
/// the failure is handed to the persistence observer (by default a `warn!`
/// log). Such an item may pass the filter again in a later call.
pub struct PersistentDuplicationFilter<R: KeyValueRepo> {
    seen: HashKeyRepo<R>,
    on_persist_error: PersistObserver<R::Value>,
}

impl<R> PersistentDuplicationFilter<R>
where
    R: KeyValueRepo,
    R::Value: Debug + Clone,
{
    pub fn new(repo: R) -> Self {
        Self::with_observer(repo, |item, err| {
            warn!(
                key = %to_key(item),
                "Failed to persist item in duplication filter: {}", err
            );
        })
    }

    /// Create a filter that reports persistence failures to `observer`.
    pub fn with_observer(
        repo: R,
        observer: impl Fn(&R::Value, &RepoError) + Send + Sync + 'static,
    ) -> Self {
        Self {
            seen: HashKeyRepo::new(repo),
            on_persist_error: Box::new(observer),
        }
    }

    pub fn seen(&self) -> &HashKeyRepo<R> {
        &self.seen
    }
}

impl<R> DuplicationFilter for PersistentDuplicationFilter<R>
where
    R: KeyValueRepo,
    R::Value: Debug + Clone,
{
    type Item = R::Value;

    fn filter(&self, items: Vec<R::Value>) -> Vec<R::Value> {
        let mut distinct = Vec::new();
        for item in items {
            if self.seen.contains_value(&item) {
                continue;
            }
            if let Err(err) = self.seen.save(item.clone()) {
                (self.on_persist_error)(&item, &err);
            }
            distinct.push(item);
        }
        distinct
    }
}
