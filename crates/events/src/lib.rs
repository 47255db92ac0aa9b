//! Domain events and their stream envelopes.

pub mod envelope;
pub mod event;

pub use envelope::EventEnvelope;
pub use event::Event;
