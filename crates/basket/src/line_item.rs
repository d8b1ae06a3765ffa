//! Line item record: one stowable reference + options with a quantity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stow_core::{BasketId, DomainError, DomainResult, Entity, LineItemId, Record};

use crate::identity::IdentityKey;
use crate::options::Options;
use crate::stowable::StowableRef;

/// Quantity used when the caller does not supply one.
pub const DEFAULT_QUANTITY: u32 = 1;

/// A basket entry. Persisted as a `basket_item` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    id: Option<LineItemId>,
    basket_id: BasketId,
    stowable_type: String,
    stowable_id: String,
    quantity: u32,
    options: Options,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
    version: u64,
}

impl LineItem {
    /// Build a new, not yet persisted line item.
    pub fn new(
        basket_id: BasketId,
        stowable: StowableRef,
        quantity: u32,
        options: Options,
        at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        ensure_positive(quantity)?;
        Ok(Self {
            id: None,
            basket_id,
            stowable_type: stowable.type_tag,
            stowable_id: stowable.key,
            quantity,
            options,
            created_at: at,
            updated_at: at,
            deleted_at: None,
            version: 0,
        })
    }

    pub fn basket_id(&self) -> BasketId {
        self.basket_id
    }

    pub fn stowable_type(&self) -> &str {
        &self.stowable_type
    }

    pub fn stowable_id(&self) -> &str {
        &self.stowable_id
    }

    pub fn stowable_ref(&self) -> StowableRef {
        StowableRef::new(self.stowable_type.clone(), self.stowable_id.clone())
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey::new(self.stowable_ref(), self.options.clone())
    }

    /// Accumulate `by` onto the current quantity.
    pub fn increment(&mut self, by: u32, at: DateTime<Utc>) -> DomainResult<()> {
        ensure_positive(by)?;
        self.quantity = self
            .quantity
            .checked_add(by)
            .ok_or_else(|| DomainError::validation("quantity overflow"))?;
        self.updated_at = at;
        Ok(())
    }

    /// Replace quantity and options wholesale (no merge with prior options).
    pub fn overwrite(&mut self, quantity: u32, options: Options, at: DateTime<Utc>) -> DomainResult<()> {
        ensure_positive(quantity)?;
        self.quantity = quantity;
        self.options = options;
        self.updated_at = at;
        Ok(())
    }

    /// Unpersisted copy of this item owned by `basket_id`.
    pub fn copy_for(&self, basket_id: BasketId, at: DateTime<Utc>) -> Self {
        Self {
            id: None,
            basket_id,
            stowable_type: self.stowable_type.clone(),
            stowable_id: self.stowable_id.clone(),
            quantity: self.quantity,
            options: self.options.clone(),
            created_at: at,
            updated_at: at,
            deleted_at: None,
            version: 0,
        }
    }
}

fn ensure_positive(quantity: u32) -> DomainResult<()> {
    if quantity == 0 {
        return Err(DomainError::validation("quantity must be positive"));
    }
    Ok(())
}

impl Entity for LineItem {
    type Id = LineItemId;

    fn id(&self) -> Option<Self::Id> {
        self.id
    }
}

impl Record for LineItem {
    const KIND: &'static str = "basket_item";

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
    use chrono::Duration;

    use super::*;

    fn widget() -> StowableRef {
        StowableRef::new("Widget", 42)
    }

    #[test]
    fn new_items_are_unpersisted_and_live() {
        let now = Utc::now();
        let item = LineItem::new(BasketId::new(), widget(), 1, Options::new(), now).unwrap();
        assert_eq!(item.id(), None);
        assert!(!item.is_trashed());
        assert_eq!(item.version(), 0);
        assert_eq!(item.created_at(), now);
        assert_eq!(item.stowable_ref(), widget());
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let err = LineItem::new(BasketId::new(), widget(), 0, Options::new(), Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn increment_accumulates_and_stamps() {
        let start = Utc::now();
        let mut item = LineItem::new(BasketId::new(), widget(), 1, Options::new(), start).unwrap();
        let later = start + Duration::seconds(1);
        item.increment(2, later).unwrap();
        assert_eq!(item.quantity(), 3);
        assert_eq!(item.updated_at(), later);
    }

    #[test]
    fn increment_overflow_is_rejected_without_change() {
        let mut item =
            LineItem::new(BasketId::new(), widget(), u32::MAX, Options::new(), Utc::now()).unwrap();
        assert!(item.increment(1, Utc::now()).is_err());
        assert_eq!(item.quantity(), u32::MAX);
    }

    #[test]
    fn overwrite_replaces_options_instead_of_merging() {
        let mut item = LineItem::new(
            BasketId::new(),
            widget(),
            1,
            Options::new().with("color", "red").with("size", "L"),
            Utc::now(),
        )
        .unwrap();
        item.overwrite(6, Options::new().with("cat", "burglar"), Utc::now()).unwrap();
        assert_eq!(item.quantity(), 6);
        assert_eq!(item.options(), &Options::new().with("cat", "burglar"));
    }

    #[test]
    fn copy_for_drops_identity_and_keeps_contents() {
        let mut item = LineItem::new(
            BasketId::new(),
            widget(),
            4,
            Options::new().with("gift", true),
            Utc::now(),
        )
        .unwrap();
        item.assign_id(LineItemId::new());
        item.set_version(3);

        let target = BasketId::new();
        let copy = item.copy_for(target, Utc::now());
        assert_eq!(copy.id(), None);
        assert_eq!(copy.version(), 0);
        assert_eq!(copy.basket_id(), target);
        assert_eq!(copy.identity_key(), item.identity_key());
        assert_eq!(copy.quantity(), 4);
    }
}
