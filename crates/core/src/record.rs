//! Persisted, soft-deletable, versioned records.

use chrono::{DateTime, Utc};

use crate::entity::Entity;

/// A record kind a record store can hold.
///
/// Stores own identity and version bookkeeping: they assign the id on
/// create and bump the version on every successful write. A record is never
/// physically removed; deletion stamps `deleted_at` ("trashed").
pub trait Record: Entity + Clone + Send + Sync + 'static {
    /// Stable name of the record kind (e.g. "basket", "basket_item").
    const KIND: &'static str;

    fn assign_id(&mut self, id: Self::Id);

    /// Number of successful writes applied to this record.
    fn version(&self) -> u64;

    fn set_version(&mut self, version: u64);

    fn deleted_at(&self) -> Option<DateTime<Utc>>;

    fn set_deleted_at(&mut self, at: Option<DateTime<Utc>>);

    fn is_trashed(&self) -> bool {
        self.deleted_at().is_some()
    }
}
