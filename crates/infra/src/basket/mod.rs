//! Basket engine: line item aggregation against injected collaborators.
//!
//! A [`Basket`] is a handle over one basket record and its live line items.
//! Every mutating call persists through the [`BasketContext`] record stores
//! first and notifies the event sink afterwards:
//!
//! ```text
//! add / change / remove / merge / duplicate / delete
//!   ↓
//! 1. Live + lock + policy + quantity checks (no state change on failure)
//!   ↓
//! 2. Persist the basket record if it has no identity yet (BasketCreated)
//!   ↓
//! 3. Write line item records (create / update / soft delete)
//!   ↓
//! 4. Notify (BasketItemCreated / BasketItemUpdated / BasketItemDeleted)
//! ```
//!
//! The model assumes a single writer per basket. Stale handles are caught by
//! the record store's version check, not by locking here.

mod cascade;
mod context;
mod error;
mod handle;

pub use context::BasketContext;
pub use error::BasketError;
pub use handle::ItemHandle;

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use stow_basket::{
    BasketEvent, BasketRecord, DEFAULT_QUANTITY, IdentityKey, LineItem, Options, Stowable,
};
use stow_core::{BasketId, Entity, LineItemId, Record, UserId};

/// A basket and its live line items, in insertion order.
pub struct Basket {
    record: BasketRecord,
    items: Vec<LineItem>,
    /// Position in `items` of each live identity key.
    index: HashMap<IdentityKey, usize>,
    ctx: BasketContext,
}

impl Basket {
    /// Start a new, not yet persisted basket under `instance`.
    ///
    /// The slug is checked against every stored basket, trashed ones
    /// included. The record is persisted on the first write.
    pub fn new(ctx: BasketContext, instance: impl Into<String>) -> Result<Self, BasketError> {
        let slug = ctx.unique_slug()?;
        let record = BasketRecord::new(instance, slug, ctx.clock.now());
        Ok(Self::assemble(ctx, record, Vec::new()))
    }

    /// Wrap a stored record, loading its live items.
    pub fn load(ctx: BasketContext, record: BasketRecord) -> Result<Self, BasketError> {
        let items = match record.id() {
            Some(id) => Self::live_items_of(&ctx, id)?,
            None => Vec::new(),
        };
        Ok(Self::assemble(ctx, record, items))
    }

    fn assemble(ctx: BasketContext, record: BasketRecord, items: Vec<LineItem>) -> Self {
        let mut basket = Self {
            record,
            items,
            index: HashMap::new(),
            ctx,
        };
        basket.reindex();
        basket
    }

    fn live_items_of(ctx: &BasketContext, id: BasketId) -> Result<Vec<LineItem>, BasketError> {
        Ok(ctx
            .items
            .find_where(&|item: &LineItem| item.basket_id() == id && !item.is_trashed())?)
    }

    pub fn id(&self) -> Option<BasketId> {
        self.record.id()
    }

    pub fn instance(&self) -> &str {
        self.record.instance()
    }

    pub fn slug(&self) -> &str {
        self.record.slug()
    }

    pub fn owner(&self) -> Option<UserId> {
        self.record.user_id()
    }

    pub fn is_locked(&self) -> bool {
        self.record.is_locked()
    }

    pub fn is_deleted(&self) -> bool {
        self.record.is_trashed()
    }

    pub fn record(&self) -> &BasketRecord {
        &self.record
    }

    /// Live line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Number of live line items (not the sum of quantities).
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity())).sum()
    }

    pub fn find_item(&self, id: LineItemId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id() == Some(id))
    }

    /// Live item holding `key`, if any.
    pub fn find_by_key(&self, key: &IdentityKey) -> Option<&LineItem> {
        self.index.get(key).and_then(|&position| self.items.get(position))
    }

    pub fn context(&self) -> &BasketContext {
        &self.ctx
    }

    /// Add `quantity` of `item` with `options`.
    ///
    /// An existing live item with the same stowable and deep-equal options is
    /// incremented in place; otherwise a new item is created. Returns the item
    /// as persisted.
    pub fn add<S>(&mut self, item: &S, quantity: u32, options: Options) -> Result<LineItem, BasketError>
    where
        S: Stowable + ?Sized,
    {
        self.ensure_live()?;
        self.ensure_unlocked()?;
        let key = IdentityKey::new(item.stowable_ref(), options);
        self.verify_stowable(self.record.instance(), &key.stowable.type_tag)?;
        ensure_quantity(quantity)?;

        let basket_id = self.ensure_persisted()?;
        let now = self.ctx.clock.now();

        if let Some(position) = self.position_of(&key) {
            let mut updated = self.items[position].clone();
            updated
                .increment(quantity, now)
                .map_err(BasketError::from_quantity)?;
            if !self.ctx.items.update(&mut updated)? {
                return Err(BasketError::item_not_found(updated.id()));
            }
            self.items[position] = updated.clone();

            tracing::debug!(
                basket_id = %basket_id,
                item_id = ?updated.id(),
                stowable = %key.stowable,
                quantity = updated.quantity(),
                "basket item quantity incremented"
            );
            self.notify(BasketEvent::BasketItemUpdated {
                item: updated.clone(),
                occurred_at: now,
            })?;
            return Ok(updated);
        }

        let IdentityKey { stowable, options } = key;
        let mut created = LineItem::new(basket_id, stowable, quantity, options, now)
            .map_err(BasketError::from_quantity)?;
        self.ctx.items.create(&mut created)?;
        self.push_item(created.clone());

        tracing::debug!(
            basket_id = %basket_id,
            item_id = ?created.id(),
            stowable_type = created.stowable_type(),
            quantity = created.quantity(),
            "basket item created"
        );
        self.notify(BasketEvent::BasketItemCreated {
            item: created.clone(),
            occurred_at: now,
        })?;
        Ok(created)
    }

    /// `add(item, 1, {})`.
    pub fn add_one<S>(&mut self, item: &S) -> Result<LineItem, BasketError>
    where
        S: Stowable + ?Sized,
    {
        self.add(item, DEFAULT_QUANTITY, Options::default())
    }

    /// Overwrite quantity and options of a live item.
    ///
    /// Options are replaced, not merged. A change that would make the item
    /// identical to another live item is refused with `DuplicateItem`.
    pub fn change(
        &mut self,
        item: impl ItemHandle,
        quantity: u32,
        options: Options,
    ) -> Result<LineItem, BasketError> {
        self.ensure_live()?;
        self.ensure_unlocked()?;
        ensure_quantity(quantity)?;
        let position = self.resolve(&item)?;

        let key = IdentityKey::new(self.items[position].stowable_ref(), options);
        if let Some(other) = self.position_of(&key).filter(|&other| other != position) {
            if let Some(existing) = self.items[other].id() {
                return Err(BasketError::DuplicateItem { existing });
            }
        }

        let now = self.ctx.clock.now();
        let mut changed = self.items[position].clone();
        changed
            .overwrite(quantity, key.options, now)
            .map_err(BasketError::from_quantity)?;
        if !self.ctx.items.update(&mut changed)? {
            return Err(BasketError::item_not_found(changed.id()));
        }
        self.index.remove(&self.items[position].identity_key());
        self.index.insert(changed.identity_key(), position);
        self.items[position] = changed.clone();

        tracing::debug!(
            basket_id = ?self.id(),
            item_id = ?changed.id(),
            quantity,
            "basket item changed"
        );
        self.notify(BasketEvent::BasketItemUpdated {
            item: changed.clone(),
            occurred_at: now,
        })?;
        Ok(changed)
    }

    /// Soft-delete a live item. Returns the deleted snapshot.
    pub fn remove(&mut self, item: impl ItemHandle) -> Result<LineItem, BasketError> {
        self.ensure_live()?;
        self.ensure_unlocked()?;
        let position = self.resolve(&item)?;

        let now = self.ctx.clock.now();
        let mut removed = self.items[position].clone();
        if !self.ctx.items.soft_delete(&mut removed, now)? {
            return Err(BasketError::item_not_found(removed.id()));
        }
        self.items.remove(position);
        self.reindex();

        tracing::debug!(basket_id = ?self.id(), item_id = ?removed.id(), "basket item removed");
        self.notify(BasketEvent::BasketItemDeleted {
            item: removed.clone(),
            occurred_at: now,
        })?;
        Ok(removed)
    }

    /// Add every live item of `other` to this basket.
    ///
    /// Each item goes through `add` (same de-duplication). All incoming types
    /// are verified against this basket's policy before anything is written,
    /// so a policy rejection leaves both baskets untouched. A storage failure
    /// part-way leaves the items added so far in place. `other` is never
    /// modified. Merging a basket into itself is a no-op.
    pub fn merge(&mut self, other: &Basket) -> Result<(), BasketError> {
        if self.id().is_some() && self.id() == other.id() {
            tracing::debug!(basket_id = ?self.id(), "merge with itself skipped");
            return Ok(());
        }
        self.ensure_live()?;
        self.ensure_unlocked()?;

        for item in &other.items {
            self.verify_stowable(self.record.instance(), item.stowable_type())?;
        }
        for item in &other.items {
            self.add(&item.stowable_ref(), item.quantity(), item.options().clone())?;
        }
        self.save()?;

        tracing::debug!(
            basket_id = ?self.id(),
            source = ?other.id(),
            merged = other.items.len(),
            "baskets merged"
        );
        Ok(())
    }

    /// Copy this basket (fresh slug, new item identities) under the same
    /// instance.
    pub fn duplicate(&self) -> Result<Basket, BasketError> {
        self.duplicate_into(self.record.instance())
    }

    /// Copy this basket under `instance`. When the instance differs, every
    /// item is verified against its policy before anything is created.
    pub fn duplicate_into(&self, instance: &str) -> Result<Basket, BasketError> {
        if instance != self.record.instance() {
            for item in &self.items {
                self.verify_stowable(instance, item.stowable_type())?;
            }
        }

        let now = self.ctx.clock.now();
        let slug = self.ctx.unique_slug()?;
        let mut copy = Basket::assemble(
            self.ctx.clone(),
            self.record.replicate(instance, slug, now),
            Vec::with_capacity(self.items.len()),
        );
        let copy_id = copy.ensure_persisted()?;

        for item in &self.items {
            let mut cloned = item.copy_for(copy_id, now);
            copy.ctx.items.create(&mut cloned)?;
            copy.push_item(cloned.clone());
            copy.notify(BasketEvent::BasketItemCreated {
                item: cloned,
                occurred_at: now,
            })?;
        }

        tracing::debug!(source = ?self.id(), basket_id = %copy_id, instance, "basket duplicated");
        Ok(copy)
    }

    /// Persist the basket record (creating it on first call).
    pub fn save(&mut self) -> Result<BasketId, BasketError> {
        self.commit(|record, now| record.touch(now))
    }

    /// Refuse item mutations until `unlock`.
    pub fn lock(&mut self) -> Result<(), BasketError> {
        self.commit(|record, now| record.set_locked(true, now))
            .map(|_| ())
    }

    pub fn unlock(&mut self) -> Result<(), BasketError> {
        self.commit(|record, now| record.set_locked(false, now))
            .map(|_| ())
    }

    pub fn assign_owner(&mut self, user_id: Option<UserId>) -> Result<(), BasketError> {
        self.commit(|record, now| record.set_owner(user_id, now))
            .map(|_| ())
    }

    /// Store this basket's slug in the session under its instance name.
    pub fn remember_in_session(&self) {
        self.ctx
            .session
            .set(self.record.instance(), self.record.slug().to_string());
    }

    /// Clear the session entry for this basket's instance.
    pub fn forget_session(&self) {
        self.ctx.session.clear(self.record.instance());
    }

    fn commit(
        &mut self,
        mutate: impl FnOnce(&mut BasketRecord, DateTime<Utc>),
    ) -> Result<BasketId, BasketError> {
        self.ensure_live()?;
        let now = self.ctx.clock.now();
        let mut record = self.record.clone();
        mutate(&mut record, now);

        match record.id() {
            Some(id) => {
                if !self.ctx.baskets.update(&mut record)? {
                    return Err(BasketError::BasketNotFound(id.to_string()));
                }
                self.record = record;
                Ok(id)
            }
            None => {
                let id = self.ctx.baskets.create(&mut record)?;
                self.record = record;
                tracing::info!(basket_id = %id, instance = self.record.instance(), "basket created");
                self.notify(BasketEvent::BasketCreated {
                    basket: self.record.clone(),
                    occurred_at: now,
                })?;
                Ok(id)
            }
        }
    }

    fn ensure_persisted(&mut self) -> Result<BasketId, BasketError> {
        match self.record.id() {
            Some(id) => Ok(id),
            None => self.commit(|_, _| {}),
        }
    }

    fn ensure_live(&self) -> Result<(), BasketError> {
        if self.record.is_trashed() {
            return Err(BasketError::Deleted {
                slug: self.record.slug().to_string(),
            });
        }
        Ok(())
    }

    fn ensure_unlocked(&self) -> Result<(), BasketError> {
        if self.record.is_locked() {
            return Err(BasketError::Locked {
                slug: self.record.slug().to_string(),
            });
        }
        Ok(())
    }

    fn verify_stowable(&self, instance: &str, type_tag: &str) -> Result<(), BasketError> {
        if let Err(err) = self.ctx.policy.verify(instance, type_tag) {
            tracing::warn!(instance, type_tag, "unstowable object rejected");
            return Err(err.into());
        }
        Ok(())
    }

    fn position_of(&self, key: &IdentityKey) -> Option<usize> {
        self.index.get(key).copied()
    }

    fn push_item(&mut self, item: LineItem) {
        self.index.insert(item.identity_key(), self.items.len());
        self.items.push(item);
    }

    /// Replace the live item list and rebuild the key index.
    fn replace_items(&mut self, items: Vec<LineItem>) {
        self.items = items;
        self.reindex();
    }

    fn reindex(&mut self) {
        self.index = self
            .items
            .iter()
            .enumerate()
            .map(|(position, item)| (item.identity_key(), position))
            .collect();
    }

    fn resolve(&self, handle: &impl ItemHandle) -> Result<usize, BasketError> {
        let id = handle.line_item_id();
        id.and_then(|id| self.items.iter().position(|item| item.id() == Some(id)))
            .ok_or_else(|| BasketError::item_not_found(id))
    }

    fn notify(&self, event: BasketEvent) -> Result<(), BasketError> {
        self.ctx.events.notify(event)?;
        Ok(())
    }
}

fn ensure_quantity(quantity: u32) -> Result<(), BasketError> {
    if quantity == 0 {
        return Err(BasketError::InvalidQuantity(
            "quantity must be positive".to_string(),
        ));
    }
    Ok(())
}

impl core::fmt::Debug for Basket {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Basket")
            .field("record", &self.record)
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}
