//! De-duplication key of line items.

use serde::{Deserialize, Serialize};

use stow_core::ValueObject;

use crate::line_item::LineItem;
use crate::options::Options;
use crate::stowable::StowableRef;

/// `(type tag, key, options)`: at most one live line item per key may exist
/// within one basket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityKey {
    pub stowable: StowableRef,
    pub options: Options,
}

impl IdentityKey {
    pub fn new(stowable: StowableRef, options: Options) -> Self {
        Self { stowable, options }
    }

    /// Whether `item` carries this key: same type tag, same key, deep-equal
    /// options. No partial option matching.
    pub fn is_key_of(&self, item: &LineItem) -> bool {
        item.stowable_type() == self.stowable.type_tag
            && item.stowable_id() == self.stowable.key
            && item.options() == &self.options
    }
}

impl ValueObject for IdentityKey {}
