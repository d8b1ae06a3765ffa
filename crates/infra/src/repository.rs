//! Basket lookup and session-aware resolution.

use stow_basket::BasketRecord;
use stow_core::{BasketId, Record, UserId};

use crate::basket::{Basket, BasketContext, BasketError};

/// Entry point for finding and creating baskets against one context.
#[derive(Debug, Clone)]
pub struct Baskets {
    ctx: BasketContext,
}

impl Baskets {
    pub fn new(ctx: BasketContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &BasketContext {
        &self.ctx
    }

    /// New, unsaved basket under `instance`.
    pub fn create(&self, instance: impl Into<String>) -> Result<Basket, BasketError> {
        Basket::new(self.ctx.clone(), instance)
    }

    /// Live basket by id.
    pub fn find(&self, id: BasketId) -> Result<Option<Basket>, BasketError> {
        match self.ctx.baskets.find_by_id(id)? {
            Some(record) if !record.is_trashed() => Basket::load(self.ctx.clone(), record).map(Some),
            _ => Ok(None),
        }
    }

    /// Live basket by slug.
    pub fn find_by_slug(&self, slug: &str) -> Result<Option<Basket>, BasketError> {
        let record = self
            .ctx
            .baskets
            .find_where(&|basket: &BasketRecord| basket.slug() == slug && !basket.is_trashed())?
            .into_iter()
            .next();
        record
            .map(|record| Basket::load(self.ctx.clone(), record))
            .transpose()
    }

    /// Live baskets owned by `user_id`, in creation order.
    pub fn for_owner(&self, user_id: UserId) -> Result<Vec<Basket>, BasketError> {
        self.ctx
            .baskets
            .find_where(&|basket: &BasketRecord| {
                basket.user_id() == Some(user_id) && !basket.is_trashed()
            })?
            .into_iter()
            .map(|record| Basket::load(self.ctx.clone(), record))
            .collect()
    }

    /// The basket the session remembers for `instance`, or a fresh saved one.
    ///
    /// A remembered slug that no longer resolves to a live basket of the same
    /// instance is replaced.
    pub fn current(&self, instance: &str) -> Result<Basket, BasketError> {
        if let Some(slug) = self.ctx.session.get(instance) {
            if let Some(basket) = self.find_by_slug(&slug)? {
                if basket.instance() == instance {
                    return Ok(basket);
                }
            }
            tracing::debug!(instance, slug = %slug, "stale basket slug in session");
        }

        let mut basket = self.create(instance)?;
        basket.save()?;
        basket.remember_in_session();
        Ok(basket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stow_basket::StowableRef;

    fn widget(key: u32) -> StowableRef {
        StowableRef::new("Widget", key)
    }

    #[test]
    fn current_creates_then_reuses_session_basket() {
        let baskets = Baskets::new(BasketContext::in_memory());

        let first = baskets.current("basket").unwrap();
        let second = baskets.current("basket").unwrap();

        assert!(first.id().is_some());
        assert_eq!(first.id(), second.id());
        assert_eq!(
            baskets.context().session().get("basket").as_deref(),
            Some(first.slug())
        );
    }

    #[test]
    fn current_keeps_instances_apart() {
        let baskets = Baskets::new(BasketContext::in_memory());

        let cart = baskets.current("basket").unwrap();
        let wishlist = baskets.current("wishlist").unwrap();

        assert_ne!(cart.id(), wishlist.id());
        assert_eq!(wishlist.instance(), "wishlist");
    }

    #[test]
    fn current_replaces_deleted_basket() {
        let baskets = Baskets::new(BasketContext::in_memory());
        let mut first = baskets.current("basket").unwrap();
        first.delete().unwrap();

        let second = baskets.current("basket").unwrap();

        assert_ne!(first.id(), second.id());
        assert!(!second.is_deleted());
    }

    #[test]
    fn find_loads_live_items_only() {
        let baskets = Baskets::new(BasketContext::in_memory());
        let mut basket = baskets.create("basket").unwrap();
        basket.add_one(&widget(1)).unwrap();
        let gone = basket.add_one(&widget(2)).unwrap();
        basket.remove(&gone).unwrap();

        let loaded = baskets.find(basket.id().unwrap()).unwrap().unwrap();

        assert_eq!(loaded.item_count(), 1);
        assert_eq!(loaded.items()[0].stowable_id(), "1");
    }

    #[test]
    fn find_skips_trashed_baskets() {
        let baskets = Baskets::new(BasketContext::in_memory());
        let mut basket = baskets.create("basket").unwrap();
        let id = basket.save().unwrap();
        let slug = basket.slug().to_string();
        basket.delete().unwrap();

        assert!(baskets.find(id).unwrap().is_none());
        assert!(baskets.find_by_slug(&slug).unwrap().is_none());
    }

    #[test]
    fn for_owner_lists_owned_baskets() {
        let baskets = Baskets::new(BasketContext::in_memory());
        let owner = UserId::new();

        let mut mine = baskets.create("basket").unwrap();
        mine.assign_owner(Some(owner)).unwrap();
        let mut other = baskets.create("basket").unwrap();
        other.save().unwrap();

        let owned = baskets.for_owner(owner).unwrap();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].id(), mine.id());
    }
}
