//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Basket records receive their identity from the record store, so an entity
/// that has never been persisted reports no id.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug + Send + Sync + 'static;

    /// Returns the entity identifier, or `None` before the first persist.
    fn id(&self) -> Option<Self::Id>;

    /// Whether the entity has been assigned an identity by a store.
    fn is_persisted(&self) -> bool {
        self.id().is_some()
    }
}
