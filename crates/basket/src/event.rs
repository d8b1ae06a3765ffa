//! Notifications emitted by basket operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stow_core::{BasketId, Entity};
use stow_events::Event;

use crate::basket::BasketRecord;
use crate::line_item::LineItem;

/// Kind of a [`BasketEvent`], for filtering without matching payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasketEventKind {
    BasketCreated,
    /// Emitted before the cascade of a basket deletion starts.
    BasketDeleting,
    BasketDeleted,
    BasketItemCreated,
    BasketItemUpdated,
    BasketItemDeleted,
}

/// State transition of a basket or one of its items. Payloads are snapshots
/// taken right after the change was persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BasketEvent {
    BasketCreated {
        basket: BasketRecord,
        occurred_at: DateTime<Utc>,
    },
    BasketDeleting {
        basket: BasketRecord,
        occurred_at: DateTime<Utc>,
    },
    BasketDeleted {
        basket: BasketRecord,
        occurred_at: DateTime<Utc>,
    },
    BasketItemCreated {
        item: LineItem,
        occurred_at: DateTime<Utc>,
    },
    BasketItemUpdated {
        item: LineItem,
        occurred_at: DateTime<Utc>,
    },
    BasketItemDeleted {
        item: LineItem,
        occurred_at: DateTime<Utc>,
    },
}

impl BasketEvent {
    pub fn kind(&self) -> BasketEventKind {
        match self {
            BasketEvent::BasketCreated { .. } => BasketEventKind::BasketCreated,
            BasketEvent::BasketDeleting { .. } => BasketEventKind::BasketDeleting,
            BasketEvent::BasketDeleted { .. } => BasketEventKind::BasketDeleted,
            BasketEvent::BasketItemCreated { .. } => BasketEventKind::BasketItemCreated,
            BasketEvent::BasketItemUpdated { .. } => BasketEventKind::BasketItemUpdated,
            BasketEvent::BasketItemDeleted { .. } => BasketEventKind::BasketItemDeleted,
        }
    }

    /// Basket the event belongs to (`None` only for never-persisted snapshots).
    pub fn basket_id(&self) -> Option<BasketId> {
        match self {
            BasketEvent::BasketCreated { basket, .. }
            | BasketEvent::BasketDeleting { basket, .. }
            | BasketEvent::BasketDeleted { basket, .. } => basket.id(),
            BasketEvent::BasketItemCreated { item, .. }
            | BasketEvent::BasketItemUpdated { item, .. }
            | BasketEvent::BasketItemDeleted { item, .. } => Some(item.basket_id()),
        }
    }

    /// Item snapshot for item-level events.
    pub fn item(&self) -> Option<&LineItem> {
        match self {
            BasketEvent::BasketItemCreated { item, .. }
            | BasketEvent::BasketItemUpdated { item, .. }
            | BasketEvent::BasketItemDeleted { item, .. } => Some(item),
            _ => None,
        }
    }
}

impl Event for BasketEvent {
    fn event_type(&self) -> &'static str {
        match self.kind() {
            BasketEventKind::BasketCreated => "basket.created",
            BasketEventKind::BasketDeleting => "basket.deleting",
            BasketEventKind::BasketDeleted => "basket.deleted",
            BasketEventKind::BasketItemCreated => "basket.item.created",
            BasketEventKind::BasketItemUpdated => "basket.item.updated",
            BasketEventKind::BasketItemDeleted => "basket.item.deleted",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            BasketEvent::BasketCreated { occurred_at, .. }
            | BasketEvent::BasketDeleting { occurred_at, .. }
            | BasketEvent::BasketDeleted { occurred_at, .. }
            | BasketEvent::BasketItemCreated { occurred_at, .. }
            | BasketEvent::BasketItemUpdated { occurred_at, .. }
            | BasketEvent::BasketItemDeleted { occurred_at, .. } => *occurred_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use stow_core::Record;

    use super::*;
    use crate::options::Options;
    use crate::stowable::StowableRef;

    #[test]
    fn item_events_report_their_basket() {
        let basket_id = BasketId::new();
        let now = Utc::now();
        let item = LineItem::new(basket_id, StowableRef::new("Widget", 1), 1, Options::new(), now).unwrap();
        let event = BasketEvent::BasketItemCreated {
            item: item.clone(),
            occurred_at: now,
        };

        assert_eq!(event.kind(), BasketEventKind::BasketItemCreated);
        assert_eq!(event.basket_id(), Some(basket_id));
        assert_eq!(event.item(), Some(&item));
        assert_eq!(event.event_type(), "basket.item.created");
        assert_eq!(event.occurred_at(), now);
    }

    #[test]
    fn serializes_with_a_kind_tag() {
        let now = Utc::now();
        let mut basket = BasketRecord::new("basket", "s".repeat(40), now);
        basket.assign_id(BasketId::new());
        let event = BasketEvent::BasketDeleted {
            basket,
            occurred_at: now,
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "basket_deleted");
        let back: BasketEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
