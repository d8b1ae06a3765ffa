//! Keyed record store boundary.
//!
//! Baskets and line items are persisted through this narrow interface without
//! any storage assumptions; the in-memory implementation backs tests and dev.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryRecordStore;
pub use r#trait::{RecordStore, StoreError};
