//! Value object trait: equality by value, not identity.
//!
//! Stowable references, option sets and identity keys are value objects: two
//! values with the same attributes are interchangeable.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Engraving(String);
///
/// impl ValueObject for Engraving {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
