//! Basket record: the persisted root of a basket.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stow_core::{BasketId, Entity, Record, UserId};

/// Instance name used when the caller does not pick one.
pub const DEFAULT_INSTANCE: &str = "basket";

/// Persisted attributes of a basket. Line items are separate records that
/// point back at the basket id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasketRecord {
    id: Option<BasketId>,
    user_id: Option<UserId>,
    instance: String,
    slug: String,
    locked: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
    version: u64,
}

impl BasketRecord {
    /// Build a new, not yet persisted basket record.
    pub fn new(instance: impl Into<String>, slug: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            id: None,
            user_id: None,
            instance: instance.into(),
            slug: slug.into(),
            locked: false,
            created_at: at,
            updated_at: at,
            deleted_at: None,
            version: 0,
        }
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }

    pub fn set_locked(&mut self, locked: bool, at: DateTime<Utc>) {
        self.locked = locked;
        self.updated_at = at;
    }

    pub fn set_owner(&mut self, user_id: Option<UserId>, at: DateTime<Utc>) {
        self.user_id = user_id;
        self.updated_at = at;
    }

    /// Unpersisted copy under `instance` with a new slug. The owner carries
    /// over; the lock does not.
    pub fn replicate(&self, instance: impl Into<String>, slug: impl Into<String>, at: DateTime<Utc>) -> Self {
        let mut copy = Self::new(instance, slug, at);
        copy.user_id = self.user_id;
        copy
    }
}

impl Entity for BasketRecord {
    type Id = BasketId;

    fn id(&self) -> Option<Self::Id> {
        self.id
    }
}

impl Record for BasketRecord {
    const KIND: &'static str = "basket";

    fn assign_id(&mut self, id: Self::Id) {
        self.id = Some(id);
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    fn set_deleted_at(&mut self, at: Option<DateTime<Utc>>) {
        self.deleted_at = at;
        if let Some(at) = at {
            self.updated_at = at;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replicate_keeps_owner_but_not_lock_or_identity() {
        let now = Utc::now();
        let mut source = BasketRecord::new(DEFAULT_INSTANCE, "a".repeat(40), now);
        source.assign_id(BasketId::new());
        let owner = UserId::new();
        source.set_owner(Some(owner), now);
        source.set_locked(true, now);

        let copy = source.replicate("wishlist", "b".repeat(40), now);
        assert_eq!(copy.id(), None);
        assert_eq!(copy.instance(), "wishlist");
        assert_eq!(copy.slug(), "b".repeat(40));
        assert_eq!(copy.user_id(), Some(owner));
        assert!(!copy.is_locked());
    }

    #[test]
    fn trashing_stamps_updated_at() {
        let now = Utc::now();
        let mut record = BasketRecord::new(DEFAULT_INSTANCE, "slug", now);
        let later = now + chrono::Duration::minutes(1);
        record.set_deleted_at(Some(later));
        assert!(record.is_trashed());
        assert_eq!(record.updated_at(), later);
    }
}
