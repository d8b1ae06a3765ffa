use std::sync::Arc;

use stow_basket::{BasketEvent, BasketRecord, LineItem, OpenPolicy, StowabilityPolicy};
use stow_core::{Clock, SystemClock};
use stow_events::{EventSink, NullSink};

use crate::record_store::{InMemoryRecordStore, RecordStore, StoreError};
use crate::session::{InMemorySessionStore, SessionStore};
use crate::slug::{RandomSlugs, SlugSource};

/// Collaborators a basket works against.
///
/// Cheap to clone; every basket handle carries one. Defaults: open policy,
/// discarded notifications, in-memory session, random slugs, system clock.
#[derive(Clone)]
pub struct BasketContext {
    pub(crate) baskets: Arc<dyn RecordStore<BasketRecord>>,
    pub(crate) items: Arc<dyn RecordStore<LineItem>>,
    pub(crate) events: Arc<dyn EventSink<BasketEvent>>,
    pub(crate) policy: Arc<dyn StowabilityPolicy>,
    pub(crate) session: Arc<dyn SessionStore>,
    pub(crate) slugs: Arc<dyn SlugSource>,
    pub(crate) clock: Arc<dyn Clock>,
}

impl BasketContext {
    pub fn new(
        baskets: Arc<dyn RecordStore<BasketRecord>>,
        items: Arc<dyn RecordStore<LineItem>>,
    ) -> Self {
        Self {
            baskets,
            items,
            events: Arc::new(NullSink),
            policy: Arc::new(OpenPolicy),
            session: Arc::new(InMemorySessionStore::new()),
            slugs: Arc::new(RandomSlugs::default()),
            clock: Arc::new(SystemClock),
        }
    }

    /// Context backed entirely by in-memory stores.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryRecordStore::<BasketRecord>::new()),
            Arc::new(InMemoryRecordStore::<LineItem>::new()),
        )
    }

    pub fn with_events(mut self, events: Arc<dyn EventSink<BasketEvent>>) -> Self {
        self.events = events;
        self
    }

    pub fn with_policy(mut self, policy: Arc<dyn StowabilityPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_session(mut self, session: Arc<dyn SessionStore>) -> Self {
        self.session = session;
        self
    }

    pub fn with_slugs(mut self, slugs: Arc<dyn SlugSource>) -> Self {
        self.slugs = slugs;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn baskets(&self) -> &dyn RecordStore<BasketRecord> {
        self.baskets.as_ref()
    }

    pub fn items(&self) -> &dyn RecordStore<LineItem> {
        self.items.as_ref()
    }

    pub fn session(&self) -> &dyn SessionStore {
        self.session.as_ref()
    }

    /// Generate a slug no basket (live or trashed) uses yet.
    pub fn unique_slug(&self) -> Result<String, StoreError> {
        loop {
            let candidate = self.slugs.generate();
            let taken = self
                .baskets
                .count_where(&|basket: &BasketRecord| basket.slug() == candidate)?;
            if taken == 0 {
                return Ok(candidate);
            }
            tracing::debug!(slug = %candidate, "basket slug collision, regenerating");
        }
    }
}

impl core::fmt::Debug for BasketContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BasketContext").finish_non_exhaustive()
    }
}
