use stow_basket::LineItem;
use stow_core::{Entity, LineItemId};

/// Anything that identifies a line item: the item itself or its id.
///
/// `basket.remove(&item)` and `basket.remove(item_id)` are equivalent.
pub trait ItemHandle {
    fn line_item_id(&self) -> Option<LineItemId>;
}

impl ItemHandle for LineItemId {
    fn line_item_id(&self) -> Option<LineItemId> {
        Some(*self)
    }
}

impl ItemHandle for Option<LineItemId> {
    fn line_item_id(&self) -> Option<LineItemId> {
        *self
    }
}

impl ItemHandle for LineItem {
    fn line_item_id(&self) -> Option<LineItemId> {
        self.id()
    }
}

impl<T: ItemHandle + ?Sized> ItemHandle for &T {
    fn line_item_id(&self) -> Option<LineItemId> {
        (**self).line_item_id()
    }
}
