//! Basket domain module.
//!
//! Records, value objects and rules of the basket aggregation model,
//! implemented purely as deterministic domain logic (no IO, no storage).
//! Orchestration against a record store lives in `stow-infra`.

pub mod basket;
pub mod event;
pub mod identity;
pub mod line_item;
pub mod options;
pub mod policy;
pub mod stowable;

pub use basket::{BasketRecord, DEFAULT_INSTANCE};
pub use event::{BasketEvent, BasketEventKind};
pub use identity::IdentityKey;
pub use line_item::{DEFAULT_QUANTITY, LineItem};
pub use options::Options;
pub use policy::{AllowListPolicy, OpenPolicy, StowabilityPolicy, UnstowableObject};
pub use stowable::{Stowable, StowableRef};
