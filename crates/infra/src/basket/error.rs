use thiserror::Error;

use stow_basket::UnstowableObject;
use stow_core::{BasketId, DomainError, LineItemId};
use stow_events::SinkError;

use crate::record_store::StoreError;

/// Error returned by basket operations.
///
/// Every failure surfaces synchronously to the caller of the operation;
/// nothing is logged-and-ignored.
#[derive(Debug, Error)]
pub enum BasketError {
    /// The stowable's type is not permitted in this basket instance.
    #[error(transparent)]
    Unstowable(#[from] UnstowableObject),

    /// The handle or id does not resolve to a live item of this basket.
    #[error("line item not found in basket (id: {item_id:?})")]
    ItemNotFound { item_id: Option<LineItemId> },

    #[error("basket not found: {0}")]
    BasketNotFound(String),

    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// Item mutations are refused while a basket is locked.
    #[error("basket {slug} is locked")]
    Locked { slug: String },

    /// The basket was deleted; its handle accepts no further writes.
    #[error("basket {slug} is deleted")]
    Deleted { slug: String },

    /// A change would give two live items the same stowable and options.
    #[error("line item {existing} already holds this stowable with these options")]
    DuplicateItem { existing: LineItemId },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Publish(#[from] SinkError),

    /// Deleting a basket failed part-way through its cascade.
    ///
    /// `deleted` items were soft-deleted (and reported deleted) before the
    /// failure; `compensated` tells whether all of them were restored.
    ///
    /// Not used when only the closing `BasketDeleted` notification fails:
    /// that surfaces as `Publish` with the basket already deleted.
    #[error(
        "cascade deletion of basket {basket_id} failed after {deleted} item(s) (compensated: {compensated})"
    )]
    CascadeDeletion {
        basket_id: BasketId,
        deleted: usize,
        compensated: bool,
        #[source]
        source: Box<BasketError>,
    },
}

impl BasketError {
    pub(crate) fn item_not_found(item_id: Option<LineItemId>) -> Self {
        Self::ItemNotFound { item_id }
    }

    /// Line item arithmetic only fails on quantity rules.
    pub(crate) fn from_quantity(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => Self::InvalidQuantity(msg),
            other => Self::InvalidQuantity(other.to_string()),
        }
    }

    /// Policy rejection, as opposed to a storage or notification failure.
    pub fn is_unstowable(&self) -> bool {
        matches!(self, Self::Unstowable(_))
    }
}
