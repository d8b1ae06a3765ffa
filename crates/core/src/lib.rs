//! `stow-core`: foundation building blocks shared by the basket crates.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod clock;
pub mod entity;
pub mod error;
pub mod id;
pub mod record;
pub mod value_object;
pub mod version;

pub use clock::{Clock, ManualClock, SystemClock};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{BasketId, EventId, LineItemId, UserId};
pub use record::Record;
pub use value_object::ValueObject;
pub use version::ExpectedVersion;
