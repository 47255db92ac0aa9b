use serde::{Deserialize, Serialize};
use uuid::Uuid;

use optistock_core::ItemId;

use crate::event::Event;

/// Envelope for an event, carrying stream metadata.
///
/// This is the unit appended to a catalog item's journal.
///
/// Notes:
/// - **Append-only**: `sequence_number` increases by one per stream, starting at 1.
/// - `payload` is the domain event itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: Uuid,

    aggregate_id: ItemId,
    aggregate_type: String,

    /// Monotonically increasing position in the aggregate stream.
    sequence_number: u64,

    payload: E,
}

impl<E> EventEnvelope<E> {
    pub fn new(
        event_id: Uuid,
        aggregate_id: ItemId,
        aggregate_type: impl Into<String>,
        sequence_number: u64,
        payload: E,
    ) -> Self {
        Self {
            event_id,
            aggregate_id,
            aggregate_type: aggregate_type.into(),
            sequence_number,
            payload,
        }
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn aggregate_id(&self) -> ItemId {
        self.aggregate_id
    }

    pub fn aggregate_type(&self) -> &str {
        &self.aggregate_type
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}

impl<E: Event> EventEnvelope<E> {
    /// Wrap a freshly decided event with a new time-ordered id.
    pub fn wrap(aggregate_id: ItemId, aggregate_type: &str, sequence_number: u64, payload: E) -> Self {
        Self::new(Uuid::now_v7(), aggregate_id, aggregate_type, sequence_number, payload)
    }

    pub fn event_type(&self) -> &'static str {
        self.payload.event_type()
    }
}
