use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use stow_core::{ExpectedVersion, Record};

use super::r#trait::{RecordStore, StoreError};

#[derive(Debug)]
struct Inner<R: Record> {
    records: Vec<R>,
    index: HashMap<R::Id, usize>,
}

/// In-memory record store.
///
/// Intended for tests/dev. Keeps creation order and assigns UUIDv7 ids.
#[derive(Debug)]
pub struct InMemoryRecordStore<R: Record> {
    inner: RwLock<Inner<R>>,
}

impl<R: Record> InMemoryRecordStore<R> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                records: Vec::new(),
                index: HashMap::new(),
            }),
        }
    }

    /// Total number of records, trashed ones included.
    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn poisoned() -> StoreError {
        StoreError::Backend("lock poisoned".to_string())
    }

    fn require_id(record: &R) -> Result<R::Id, StoreError> {
        record
            .id()
            .ok_or_else(|| StoreError::InvalidRecord(format!("{} has no id", R::KIND)))
    }
}

impl<R: Record> Default for InMemoryRecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> RecordStore<R> for InMemoryRecordStore<R>
where
    R: Record,
    R::Id: From<Uuid>,
{
    fn create(&self, record: &mut R) -> Result<R::Id, StoreError> {
        if let Some(id) = record.id() {
            return Err(StoreError::InvalidRecord(format!(
                "{} {id:?} is already persisted",
                R::KIND
            )));
        }

        let mut inner = self.inner.write().map_err(|_| Self::poisoned())?;

        let id = R::Id::from(Uuid::now_v7());
        record.assign_id(id);
        record.set_version(1);

        let position = inner.records.len();
        inner.records.push(record.clone());
        inner.index.insert(id, position);

        Ok(id)
    }

    fn find_by_id(&self, id: R::Id) -> Result<Option<R>, StoreError> {
        let inner = self.inner.read().map_err(|_| Self::poisoned())?;
        Ok(inner
            .index
            .get(&id)
            .and_then(|&position| inner.records.get(position))
            .cloned())
    }

    fn update(&self, record: &mut R) -> Result<bool, StoreError> {
        let id = Self::require_id(record)?;
        let mut inner = self.inner.write().map_err(|_| Self::poisoned())?;

        let Some(&position) = inner.index.get(&id) else {
            return Ok(false);
        };
        let Some(stored) = inner.records.get_mut(position) else {
            return Ok(false);
        };

        ExpectedVersion(record.version())
            .check(stored.version())
            .map_err(|e| StoreError::Concurrency(format!("{} {id:?}: {e}", R::KIND)))?;

        record.set_version(stored.version() + 1);
        *stored = record.clone();
        Ok(true)
    }

    fn soft_delete(&self, record: &mut R, at: DateTime<Utc>) -> Result<bool, StoreError> {
        let id = Self::require_id(record)?;
        let mut inner = self.inner.write().map_err(|_| Self::poisoned())?;

        let Some(&position) = inner.index.get(&id) else {
            return Ok(false);
        };
        let Some(stored) = inner.records.get_mut(position) else {
            return Ok(false);
        };
        if stored.is_trashed() {
            return Ok(false);
        }

        ExpectedVersion(record.version())
            .check(stored.version())
            .map_err(|e| StoreError::Concurrency(format!("{} {id:?}: {e}", R::KIND)))?;

        record.set_deleted_at(Some(at));
        record.set_version(stored.version() + 1);
        *stored = record.clone();
        Ok(true)
    }

    fn count_where(&self, predicate: &dyn Fn(&R) -> bool) -> Result<usize, StoreError> {
        let inner = self.inner.read().map_err(|_| Self::poisoned())?;
        Ok(inner.records.iter().filter(|&r| predicate(r)).count())
    }

    fn find_where(&self, predicate: &dyn Fn(&R) -> bool) -> Result<Vec<R>, StoreError> {
        let inner = self.inner.read().map_err(|_| Self::poisoned())?;
        Ok(inner
            .records
            .iter()
            .filter(|&r| predicate(r))
            .cloned()
            .collect())
    }
}
