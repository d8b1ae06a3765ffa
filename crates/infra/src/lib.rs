//! Infrastructure layer: record and session stores, slugs, configuration and
//! the basket engine that drives them.

pub mod basket;
pub mod config;
pub mod record_store;
pub mod repository;
pub mod session;
pub mod slug;


pub use basket::{Basket, BasketContext, BasketError, ItemHandle};
pub use config::BasketConfig;
pub use record_store::{InMemoryRecordStore, RecordStore, StoreError};
pub use repository::Baskets;
pub use session::{InMemorySessionStore, SessionStore};
pub use slug::{RandomSlugs, ScriptedSlugs, SlugSource};
