//! The "can be put in a basket" capability.

use serde::{Deserialize, Serialize};

use stow_core::ValueObject;

/// An externally-owned entity that can be referenced by a line item.
///
/// The basket never looks inside a stowable beyond its type tag and key.
/// Implement this on catalog types (products, gift cards, subscriptions):
///
/// ```ignore
/// impl Stowable for Product {
///     fn type_tag(&self) -> &str { "Product" }
///     fn key(&self) -> String { self.id.to_string() }
/// }
/// ```
pub trait Stowable {
    /// Type tag of the entity (selects policy and distinguishes key spaces).
    fn type_tag(&self) -> &str;

    /// Opaque key of the entity within its type.
    fn key(&self) -> String;

    fn stowable_ref(&self) -> StowableRef {
        StowableRef::new(self.type_tag(), self.key())
    }
}

/// Non-owning `(type tag, key)` reference to a stowable entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StowableRef {
    pub type_tag: String,
    pub key: String,
}

impl StowableRef {
    pub fn new(type_tag: impl Into<String>, key: impl ToString) -> Self {
        Self {
            type_tag: type_tag.into(),
            key: key.to_string(),
        }
    }
}

impl ValueObject for StowableRef {}

impl Stowable for StowableRef {
    fn type_tag(&self) -> &str {
        &self.type_tag
    }

    fn key(&self) -> String {
        self.key.clone()
    }

    fn stowable_ref(&self) -> StowableRef {
        self.clone()
    }
}

impl core::fmt::Display for StowableRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}#{}", self.type_tag, self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Widget {
        id: u64,
    }

    impl Stowable for Widget {
        fn type_tag(&self) -> &str {
            "Widget"
        }

        fn key(&self) -> String {
            self.id.to_string()
        }
    }

    #[test]
    fn stowable_ref_captures_tag_and_key() {
        let widget = Widget { id: 42 };
        assert_eq!(widget.stowable_ref(), StowableRef::new("Widget", 42));
        assert_eq!(widget.stowable_ref().to_string(), "Widget#42");
    }

    #[test]
    fn same_key_under_different_tags_is_a_different_ref() {
        assert_ne!(StowableRef::new("Widget", 1), StowableRef::new("Gadget", 1));
    }
}
