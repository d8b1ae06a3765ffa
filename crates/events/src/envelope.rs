use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stow_core::EventId;

use crate::event::Event;

/// Envelope for an event published on a bus.
///
/// The envelope carries the metadata subscribers filter on (`event_type`,
/// `occurred_at`) so they do not have to inspect the payload first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: EventId,
    event_type: String,
    event_version: u32,
    occurred_at: DateTime<Utc>,
    payload: E,
}

impl<E> EventEnvelope<E> {
    pub fn new(
        event_id: EventId,
        event_type: impl Into<String>,
        event_version: u32,
        occurred_at: DateTime<Utc>,
        payload: E,
    ) -> Self {
        Self {
            event_id,
            event_type: event_type.into(),
            event_version,
            occurred_at,
            payload,
        }
    }

    pub fn event_id(&self) -> EventId {
        self.event_id
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn event_version(&self) -> u32 {
        self.event_version
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}

impl<E: Event> EventEnvelope<E> {
    /// Wrap a typed event, copying its metadata onto the envelope.
    pub fn wrap(event: E) -> Self {
        Self::new(
            EventId::new(),
            event.event_type(),
            event.version(),
            event.occurred_at(),
            event,
        )
    }
}
