//! Stock catalog repository.
//!
//! The catalog owns every `StockItem` aggregate and its append-only journal.
//! Callers never touch aggregates directly: they read immutable snapshots
//! and change state by executing commands.
//!
//! ```text
//! StockCommand
//!   ↓
//! 1. Load (or create empty) aggregate
//!   ↓
//! 2. Handle command (pure decision logic, produces events)
//!   ↓
//! 3. Apply events + append envelopes to the item's journal
//! ```

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use thiserror::Error;

use optistock_core::{Aggregate, DomainError, ItemId};
use optistock_events::EventEnvelope;
use optistock_inventory::{InventoryEvent, StockCommand, StockItem, StockItemSnapshot, AGGREGATE_TYPE};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The command was refused by the domain.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A writer panicked while holding the catalog lock.
    #[error("catalog storage unavailable: {0}")]
    Storage(String),

    /// Journal replay did not reproduce the stored aggregate.
    #[error("journal corrupted for item {item_id}: {reason}")]
    Journal { item_id: ItemId, reason: String },
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Repository of catalog entries.
pub trait StockCatalog: Send + Sync {
    fn get(&self, id: ItemId) -> CatalogResult<Option<StockItemSnapshot>>;

    /// All entries, ordered by id.
    fn list(&self) -> CatalogResult<Vec<StockItemSnapshot>>;

    /// Execute a command against one entry and return the recorded envelopes.
    ///
    /// A command that decides nothing (e.g. a count matching the quantity of
    /// record) records nothing and returns an empty vector.
    fn execute(&self, command: StockCommand) -> CatalogResult<Vec<EventEnvelope<InventoryEvent>>>;

    /// Journal of one entry, oldest first.
    fn events_for(&self, id: ItemId) -> CatalogResult<Vec<EventEnvelope<InventoryEvent>>>;
}

impl<S> StockCatalog for Arc<S>
where
    S: StockCatalog + ?Sized,
{
    fn get(&self, id: ItemId) -> CatalogResult<Option<StockItemSnapshot>> {
        (**self).get(id)
    }

    fn list(&self) -> CatalogResult<Vec<StockItemSnapshot>> {
        (**self).list()
    }

    fn execute(&self, command: StockCommand) -> CatalogResult<Vec<EventEnvelope<InventoryEvent>>> {
        (**self).execute(command)
    }

    fn events_for(&self, id: ItemId) -> CatalogResult<Vec<EventEnvelope<InventoryEvent>>> {
        (**self).events_for(id)
    }
}

#[derive(Debug, Clone)]
struct CatalogEntry {
    item: StockItem,
    journal: Vec<EventEnvelope<InventoryEvent>>,
}

/// In-memory catalog for the shop and for tests.
#[derive(Debug, Default)]
pub struct InMemoryStockCatalog {
    inner: RwLock<BTreeMap<ItemId, CatalogEntry>>,
}

impl InMemoryStockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild an entry from its journal alone.
    pub fn rehydrate(&self, id: ItemId) -> CatalogResult<StockItem> {
        let journal = self.events_for(id)?;
        if journal.is_empty() {
            return Err(DomainError::not_found().into());
        }

        let mut item = StockItem::empty(id);
        for (expected, envelope) in (1u64..).zip(&journal) {
            if envelope.sequence_number() != expected {
                return Err(CatalogError::Journal {
                    item_id: id,
                    reason: format!(
                        "non-monotonic sequence (expected: {expected}, found: {})",
                        envelope.sequence_number()
                    ),
                });
            }
            item.apply(envelope.payload());
        }
        Ok(item)
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> CatalogError {
    CatalogError::Storage("catalog lock poisoned".to_string())
}

impl StockCatalog for InMemoryStockCatalog {
    fn get(&self, id: ItemId) -> CatalogResult<Option<StockItemSnapshot>> {
        let map = self.inner.read().map_err(poisoned)?;
        Ok(map.get(&id).map(|e| e.item.snapshot()))
    }

    fn list(&self) -> CatalogResult<Vec<StockItemSnapshot>> {
        let map = self.inner.read().map_err(poisoned)?;
        Ok(map.values().map(|e| e.item.snapshot()).collect())
    }

    fn execute(&self, command: StockCommand) -> CatalogResult<Vec<EventEnvelope<InventoryEvent>>> {
        let item_id = command.item_id();
        let mut map = self.inner.write().map_err(poisoned)?;

        let current = map.get(&item_id).map(|e| &e.item);
        let empty;
        let item = match current {
            Some(item) => item,
            None => {
                empty = StockItem::empty(item_id);
                &empty
            }
        };

        let events = item.handle(&command).inspect_err(|e| {
            tracing::debug!(%item_id, error = %e, "stock command rejected");
        })?;
        if events.is_empty() {
            return Ok(Vec::new());
        }

        let entry = map.entry(item_id).or_insert_with(|| CatalogEntry {
            item: StockItem::empty(item_id),
            journal: Vec::new(),
        });

        let mut recorded = Vec::with_capacity(events.len());
        for event in events {
            entry.item.apply(&event);
            let seq = entry.journal.len() as u64 + 1;
            let envelope = EventEnvelope::wrap(item_id, AGGREGATE_TYPE, seq, event);
            tracing::debug!(%item_id, seq, event_type = envelope.event_type(), "event recorded");
            entry.journal.push(envelope.clone());
            recorded.push(envelope);
        }

        Ok(recorded)
    }

    fn events_for(&self, id: ItemId) -> CatalogResult<Vec<EventEnvelope<InventoryEvent>>> {
        let map = self.inner.read().map_err(poisoned)?;
        Ok(map.get(&id).map(|e| e.journal.clone()).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use optistock_core::AggregateRoot;
    use optistock_inventory::{IssueStock, ItemCategory, ReceiveStock, ReconcileCount, RegisterItem};

    fn register(id: u32, stock: u32) -> StockCommand {
        StockCommand::RegisterItem(RegisterItem {
            item_id: ItemId::new(id),
            name: format!("Article {id}"),
            reference: format!("REF-{id}"),
            category: ItemCategory::Lenses,
            location: "B2-C1".to_string(),
            supplier: Some("Essilor".to_string()),
            min_stock: 5,
            max_stock: 20,
            initial_stock: stock,
            occurred_at: Utc::now(),
        })
    }

    #[test]
    fn register_records_sequenced_envelopes() {
        let catalog = InMemoryStockCatalog::new();
        let envelopes = catalog.execute(register(2, 3)).unwrap();

        assert_eq!(envelopes.len(), 2);
        assert_eq!(envelopes[0].sequence_number(), 1);
        assert_eq!(envelopes[1].sequence_number(), 2);
        assert_eq!(envelopes[0].aggregate_type(), AGGREGATE_TYPE);
        assert_eq!(catalog.get(ItemId::new(2)).unwrap().unwrap().stock, 3);
    }

    #[test]
    fn rejected_command_leaves_no_trace() {
        let catalog = InMemoryStockCatalog::new();
        let err = catalog
            .execute(StockCommand::ReceiveStock(ReceiveStock {
                item_id: ItemId::new(8),
                quantity: 1,
                note: None,
                occurred_at: Utc::now(),
            }))
            .unwrap_err();

        assert_eq!(err, CatalogError::Domain(DomainError::NotFound));
        assert!(catalog.list().unwrap().is_empty());
        assert!(catalog.events_for(ItemId::new(8)).unwrap().is_empty());
    }

    #[test]
    fn issue_over_stock_is_refused() {
        let catalog = InMemoryStockCatalog::new();
        catalog.execute(register(2, 3)).unwrap();

        let err = catalog
            .execute(StockCommand::IssueStock(IssueStock {
                item_id: ItemId::new(2),
                quantity: 4,
                note: None,
                occurred_at: Utc::now(),
            }))
            .unwrap_err();
        assert!(matches!(err, CatalogError::Domain(DomainError::InvariantViolation(_))));
        assert_eq!(catalog.get(ItemId::new(2)).unwrap().unwrap().stock, 3);
    }

    #[test]
    fn matching_count_records_nothing() {
        let catalog = InMemoryStockCatalog::new();
        catalog.execute(register(2, 3)).unwrap();

        let envelopes = catalog
            .execute(StockCommand::ReconcileCount(ReconcileCount {
                item_id: ItemId::new(2),
                counted: 3,
                occurred_at: Utc::now(),
            }))
            .unwrap();
        assert!(envelopes.is_empty());
        assert_eq!(catalog.events_for(ItemId::new(2)).unwrap().len(), 2);
    }

    #[test]
    fn list_is_ordered_by_id() {
        let catalog = InMemoryStockCatalog::new();
        catalog.execute(register(3, 0)).unwrap();
        catalog.execute(register(1, 0)).unwrap();
        catalog.execute(register(2, 0)).unwrap();

        let ids: Vec<u32> = catalog.list().unwrap().iter().map(|s| s.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn rehydration_matches_live_state() {
        let catalog = InMemoryStockCatalog::new();
        catalog.execute(register(2, 3)).unwrap();
        catalog
            .execute(StockCommand::ReceiveStock(ReceiveStock {
                item_id: ItemId::new(2),
                quantity: 7,
                note: None,
                occurred_at: Utc::now(),
            }))
            .unwrap();

        let rebuilt = catalog.rehydrate(ItemId::new(2)).unwrap();
        assert_eq!(rebuilt.snapshot(), catalog.get(ItemId::new(2)).unwrap().unwrap());
        assert_eq!(rebuilt.version(), 3);
    }

    #[test]
    fn shared_catalog_through_arc() {
        let catalog = Arc::new(InMemoryStockCatalog::new());
        let handle: Arc<InMemoryStockCatalog> = Arc::clone(&catalog);
        handle.execute(register(1, 1)).unwrap();
        assert!(StockCatalog::get(&catalog, ItemId::new(1)).unwrap().is_some());
    }
}
