use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use stow_core::Record;

/// Record store operation error.
///
/// These are **infrastructure errors** (storage, concurrency) as opposed to
/// domain errors (validation, policy). They are propagated unmodified; the
/// basket engine never retries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("optimistic concurrency check failed: {0}")]
    Concurrency(String),

    #[error("invalid record: {0}")]
    InvalidRecord(String),

    #[error("store backend failure: {0}")]
    Backend(String),
}

/// Keyed store for one record kind.
///
/// ## Write Semantics
///
/// - `create()` assigns the identity and writes it back onto the record
/// - `update()` and `soft_delete()` check the record's version against the
///   stored one (optimistic concurrency) and bump it on success, writing the
///   new version back onto the caller's copy
/// - records are never physically removed; `soft_delete()` stamps `deleted_at`
///
/// ## Read Semantics
///
/// - `find_by_id()` returns trashed records too (callers filter)
/// - `count_where()` / `find_where()` evaluate the predicate against every
///   record, trashed or live, in creation order
pub trait RecordStore<R: Record>: Send + Sync {
    /// Persist a new record and return its assigned id.
    fn create(&self, record: &mut R) -> Result<R::Id, StoreError>;

    fn find_by_id(&self, id: R::Id) -> Result<Option<R>, StoreError>;

    /// Overwrite a stored record. `Ok(false)` when the id is unknown.
    fn update(&self, record: &mut R) -> Result<bool, StoreError>;

    /// Mark a record deleted at `at`. `Ok(false)` when the id is unknown or
    /// the record is already trashed.
    fn soft_delete(&self, record: &mut R, at: DateTime<Utc>) -> Result<bool, StoreError>;

    fn count_where(&self, predicate: &dyn Fn(&R) -> bool) -> Result<usize, StoreError>;

    fn find_where(&self, predicate: &dyn Fn(&R) -> bool) -> Result<Vec<R>, StoreError>;
}

impl<R, S> RecordStore<R> for Arc<S>
where
    R: Record,
    S: RecordStore<R> + ?Sized,
{
    fn create(&self, record: &mut R) -> Result<R::Id, StoreError> {
        (**self).create(record)
    }

    fn find_by_id(&self, id: R::Id) -> Result<Option<R>, StoreError> {
        (**self).find_by_id(id)
    }

    fn update(&self, record: &mut R) -> Result<bool, StoreError> {
        (**self).update(record)
    }

    fn soft_delete(&self, record: &mut R, at: DateTime<Utc>) -> Result<bool, StoreError> {
        (**self).soft_delete(record, at)
    }

    fn count_where(&self, predicate: &dyn Fn(&R) -> bool) -> Result<usize, StoreError> {
        (**self).count_where(predicate)
    }

    fn find_where(&self, predicate: &dyn Fn(&R) -> bool) -> Result<Vec<R>, StoreError> {
        (**self).find_where(predicate)
    }
}
