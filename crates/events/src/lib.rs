//! Event primitives: event trait, envelopes, in-process bus and sinks.
//!
//! Basket operations report state transitions through an [`EventSink`]. The
//! sink may publish onto an [`EventBus`] (broadcast to subscribers) or simply
//! record what happened (tests, dev).

pub mod bus;
pub mod envelope;
pub mod event;
pub mod in_memory_bus;
pub mod sink;

pub use bus::{EventBus, Subscription};
pub use envelope::EventEnvelope;
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
pub use sink::{BusEventSink, EventSink, NullSink, RecordingSink, SinkError};
