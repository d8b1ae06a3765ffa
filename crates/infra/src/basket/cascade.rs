//! Cascade deletion of a basket and its line items.

use stow_basket::{BasketEvent, LineItem};
use stow_core::{BasketId, Entity, Record};

use super::{Basket, BasketError};

impl Basket {
    /// Soft-delete every live item, then the basket itself.
    ///
    /// The live items are re-read from the store first, so items written
    /// through other handles of the same basket are included.
    ///
    /// Order: `BasketDeleting`, one `BasketItemDeleted` per item, the basket
    /// record, the session entry for this instance, `BasketDeleted`. If any
    /// step up to the basket record fails, items already deleted are restored
    /// and the failure is returned as [`BasketError::CascadeDeletion`]. Item
    /// notifications that went out before the failure are not retracted.
    ///
    /// If only the final `BasketDeleted` notification fails, the deletion
    /// stands and the error is [`BasketError::Publish`]; `is_deleted()` tells
    /// the two outcomes apart.
    ///
    /// Deleting a basket that was never saved, or is already deleted, is a
    /// no-op.
    pub fn delete(&mut self) -> Result<(), BasketError> {
        let Some(basket_id) = self.id() else {
            return Ok(());
        };
        if self.record.is_trashed() {
            return Ok(());
        }

        let children = Self::live_items_of(&self.ctx, basket_id)?;
        self.replace_items(children);

        let now = self.ctx.clock.now();
        tracing::info!(basket_id = %basket_id, items = self.items.len(), "deleting basket");
        self.notify(BasketEvent::BasketDeleting {
            basket: self.record.clone(),
            occurred_at: now,
        })?;

        let mut deleted = Vec::with_capacity(self.items.len());
        for item in self.items.clone() {
            let mut trashed = item;
            let outcome = self
                .ctx
                .items
                .soft_delete(&mut trashed, now)
                .map_err(BasketError::from)
                .and_then(|found| {
                    if found {
                        Ok(())
                    } else {
                        Err(BasketError::item_not_found(trashed.id()))
                    }
                });
            if let Err(err) = outcome {
                return Err(self.compensate(basket_id, deleted, err));
            }
            deleted.push(trashed.clone());

            if let Err(err) = self.notify(BasketEvent::BasketItemDeleted {
                item: trashed,
                occurred_at: now,
            }) {
                return Err(self.compensate(basket_id, deleted, err));
            }
        }

        let mut record = self.record.clone();
        let outcome = self
            .ctx
            .baskets
            .soft_delete(&mut record, now)
            .map_err(BasketError::from)
            .and_then(|found| {
                if found {
                    Ok(())
                } else {
                    Err(BasketError::BasketNotFound(basket_id.to_string()))
                }
            });
        if let Err(err) = outcome {
            return Err(self.compensate(basket_id, deleted, err));
        }

        self.record = record;
        self.replace_items(Vec::new());
        self.forget_session();

        tracing::info!(basket_id = %basket_id, items = deleted.len(), "basket deleted");
        self.notify(BasketEvent::BasketDeleted {
            basket: self.record.clone(),
            occurred_at: now,
        })
    }

    /// Restore `deleted` items after a failed cascade.
    fn compensate(
        &mut self,
        basket_id: BasketId,
        deleted: Vec<LineItem>,
        source: BasketError,
    ) -> BasketError {
        let count = deleted.len();
        let mut compensated = true;

        for mut item in deleted {
            item.set_deleted_at(None);
            match self.ctx.items.update(&mut item) {
                Ok(true) => {
                    if let Some(slot) = self.items.iter_mut().find(|live| live.id() == item.id()) {
                        *slot = item;
                    }
                }
                Ok(false) => compensated = false,
                Err(err) => {
                    tracing::error!(
                        basket_id = %basket_id,
                        item_id = ?item.id(),
                        error = %err,
                        "failed to restore line item after cascade failure"
                    );
                    compensated = false;
                }
            }
        }

        tracing::warn!(
            basket_id = %basket_id,
            deleted = count,
            compensated,
            error = %source,
            "basket cascade deletion failed"
        );
        BasketError::CascadeDeletion {
            basket_id,
            deleted: count,
            compensated,
            source: Box::new(source),
        }
    }
}
