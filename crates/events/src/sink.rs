//! Notification sinks: where basket operations report state transitions.

use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::bus::EventBus;
use crate::envelope::EventEnvelope;
use crate::event::Event;

/// Failure to deliver a notification.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("event publication failed: {0}")]
    Publish(String),

    #[error("event sink lock poisoned")]
    Poisoned,
}

/// Receives every state transition notification of a basket.
///
/// Notifications are sent **after** the change they describe has been
/// persisted, so a failing sink never hides a write.
pub trait EventSink<E>: Send + Sync {
    fn notify(&self, event: E) -> Result<(), SinkError>;
}

impl<E, S> EventSink<E> for Arc<S>
where
    S: EventSink<E> + ?Sized,
{
    fn notify(&self, event: E) -> Result<(), SinkError> {
        (**self).notify(event)
    }
}

/// Sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl<E> EventSink<E> for NullSink {
    fn notify(&self, _event: E) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Sink that wraps each event in an [`EventEnvelope`] and publishes it on a bus.
#[derive(Debug)]
pub struct BusEventSink<B> {
    bus: B,
}

impl<B> BusEventSink<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }
}

impl<E, B> EventSink<E> for BusEventSink<B>
where
    E: Event,
    B: EventBus<EventEnvelope<E>>,
{
    fn notify(&self, event: E) -> Result<(), SinkError> {
        let envelope = EventEnvelope::wrap(event);
        tracing::trace!(event_type = envelope.event_type(), "publishing event");
        self.bus
            .publish(envelope)
            .map_err(|err| SinkError::Publish(format!("{err:?}")))
    }
}

/// Sink that keeps every event in memory, in notification order.
#[derive(Debug)]
pub struct RecordingSink<E> {
    events: Mutex<Vec<E>>,
}

impl<E> Default for RecordingSink<E> {
    fn default() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }
}

impl<E: Clone> RecordingSink<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<E> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of recorded events matching `pred`.
    pub fn count(&self, pred: impl Fn(&E) -> bool) -> usize {
        self.events
            .lock()
            .map(|e| e.iter().filter(|ev| pred(ev)).count())
            .unwrap_or(0)
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

impl<E> EventSink<E> for RecordingSink<E>
where
    E: Send + 'static,
{
    fn notify(&self, event: E) -> Result<(), SinkError> {
        let mut events = self.events.lock().map_err(|_| SinkError::Poisoned)?;
        events.push(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};

    use super::*;
    use crate::bus::EventBus;
    use crate::in_memory_bus::InMemoryEventBus;

    #[derive(Debug, Clone, PartialEq)]
    struct Ping {
        at: DateTime<Utc>,
    }

    impl Event for Ping {
        fn event_type(&self) -> &'static str {
            "test.ping"
        }

        fn version(&self) -> u32 {
            1
        }

        fn occurred_at(&self) -> DateTime<Utc> {
            self.at
        }
    }

    #[test]
    fn recording_sink_keeps_notification_order() {
        let sink = RecordingSink::new();
        sink.notify(1u8).unwrap();
        sink.notify(2u8).unwrap();
        assert_eq!(sink.events(), vec![1, 2]);
        assert_eq!(sink.count(|e| *e > 1), 1);
    }

    #[test]
    fn bus_sink_publishes_enveloped_events() {
        let bus = Arc::new(InMemoryEventBus::<EventEnvelope<Ping>>::new());
        let sub = bus.subscribe();
        let sink = BusEventSink::new(bus.clone());

        let at = Utc::now();
        sink.notify(Ping { at }).unwrap();

        let envelope = sub.try_recv().unwrap();
        assert_eq!(envelope.event_type(), "test.ping");
        assert_eq!(envelope.event_version(), 1);
        assert_eq!(envelope.occurred_at(), at);
        assert_eq!(envelope.payload(), &Ping { at });
    }
}
