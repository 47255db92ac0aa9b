use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use optistock_core::{Aggregate, AggregateRoot, DomainError, ItemId};
use optistock_events::Event;

/// Aggregate type name used in event envelopes.
pub const AGGREGATE_TYPE: &str = "inventory.item";

/// Product family of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Frames,
    Lenses,
    ContactLenses,
    Accessories,
}

impl ItemCategory {
    /// Shop-floor label.
    pub fn label(self) -> &'static str {
        match self {
            ItemCategory::Frames => "Montures",
            ItemCategory::Lenses => "Verres",
            ItemCategory::ContactLenses => "Lentilles",
            ItemCategory::Accessories => "Accessoires",
        }
    }
}

impl core::fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Why the quantity of record changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentReason {
    /// Goods received (supplier delivery, return...).
    Receipt,
    /// Goods leaving the shop (sale, defective product...).
    Issue,
    /// Correction closing a physical inventory count.
    InventoryCount,
}

/// Aggregate root: StockItem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockItem {
    id: ItemId,
    name: String,
    reference: String,
    category: ItemCategory,
    location: String,
    supplier: Option<String>,
    stock: u32,
    min_stock: u32,
    max_stock: u32,
    last_restock: Option<NaiveDate>,
    version: u64,
    created: bool,
}

/// Immutable view of a catalog entry handed out by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItemSnapshot {
    pub id: ItemId,
    pub name: String,
    pub reference: String,
    pub category: ItemCategory,
    pub location: String,
    pub supplier: Option<String>,
    pub stock: u32,
    pub min_stock: u32,
    pub max_stock: u32,
    pub last_restock: Option<NaiveDate>,
    pub version: u64,
}

impl StockItem {
    /// Create an empty, not-yet-registered aggregate instance for rehydration.
    pub fn empty(id: ItemId) -> Self {
        Self {
            id,
            name: String::new(),
            reference: String::new(),
            category: ItemCategory::Accessories,
            location: String::new(),
            supplier: None,
            stock: 0,
            min_stock: 0,
            max_stock: 0,
            last_restock: None,
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> ItemId {
        self.id
    }

    pub fn is_registered(&self) -> bool {
        self.created
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn category(&self) -> ItemCategory {
        self.category
    }

    pub fn stock(&self) -> u32 {
        self.stock
    }

    pub fn min_stock(&self) -> u32 {
        self.min_stock
    }

    pub fn last_restock(&self) -> Option<NaiveDate> {
        self.last_restock
    }

    pub fn snapshot(&self) -> StockItemSnapshot {
        StockItemSnapshot {
            id: self.id,
            name: self.name.clone(),
            reference: self.reference.clone(),
            category: self.category,
            location: self.location.clone(),
            supplier: self.supplier.clone(),
            stock: self.stock,
            min_stock: self.min_stock,
            max_stock: self.max_stock,
            last_restock: self.last_restock,
            version: self.version,
        }
    }
}

impl AggregateRoot for StockItem {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: RegisterItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterItem {
    pub item_id: ItemId,
    pub name: String,
    pub reference: String,
    pub category: ItemCategory,
    pub location: String,
    pub supplier: Option<String>,
    pub min_stock: u32,
    pub max_stock: u32,
    /// Quantity already on the shelves when the item enters the catalog.
    pub initial_stock: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ReceiveStock (stock entry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiveStock {
    pub item_id: ItemId,
    pub quantity: u32,
    pub note: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: IssueStock (stock exit).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueStock {
    pub item_id: ItemId,
    pub quantity: u32,
    pub note: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ReconcileCount (set the quantity of record to a physical count).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileCount {
    pub item_id: ItemId,
    pub counted: u32,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockCommand {
    RegisterItem(RegisterItem),
    ReceiveStock(ReceiveStock),
    IssueStock(IssueStock),
    ReconcileCount(ReconcileCount),
}

impl StockCommand {
    pub fn item_id(&self) -> ItemId {
        match self {
            StockCommand::RegisterItem(c) => c.item_id,
            StockCommand::ReceiveStock(c) => c.item_id,
            StockCommand::IssueStock(c) => c.item_id,
            StockCommand::ReconcileCount(c) => c.item_id,
        }
    }
}

/// Event: ItemRegistered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRegistered {
    pub item_id: ItemId,
    pub name: String,
    pub reference: String,
    pub category: ItemCategory,
    pub location: String,
    pub supplier: Option<String>,
    pub min_stock: u32,
    pub max_stock: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: StockAdjusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAdjusted {
    pub item_id: ItemId,
    pub delta: i64,
    pub reason: AdjustmentReason,
    pub note: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryEvent {
    ItemRegistered(ItemRegistered),
    StockAdjusted(StockAdjusted),
}

impl InventoryEvent {
    pub fn item_id(&self) -> ItemId {
        match self {
            InventoryEvent::ItemRegistered(e) => e.item_id,
            InventoryEvent::StockAdjusted(e) => e.item_id,
        }
    }
}

impl Event for InventoryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            InventoryEvent::ItemRegistered(_) => "inventory.item.registered",
            InventoryEvent::StockAdjusted(_) => "inventory.item.stock_adjusted",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            InventoryEvent::ItemRegistered(e) => e.occurred_at,
            InventoryEvent::StockAdjusted(e) => e.occurred_at,
        }
    }
}

impl Aggregate for StockItem {
    type Command = StockCommand;
    type Event = InventoryEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            InventoryEvent::ItemRegistered(e) => {
                self.id = e.item_id;
                self.name = e.name.clone();
                self.reference = e.reference.clone();
                self.category = e.category;
                self.location = e.location.clone();
                self.supplier = e.supplier.clone();
                self.min_stock = e.min_stock;
                self.max_stock = e.max_stock;
                self.stock = 0;
                self.created = true;
            }
            InventoryEvent::StockAdjusted(e) => {
                // `handle` never emits a delta that leaves the range.
                let next = i64::from(self.stock) + e.delta;
                self.stock = u32::try_from(next.max(0)).unwrap_or(u32::MAX);
                if e.reason == AdjustmentReason::Receipt {
                    self.last_restock = Some(e.occurred_at.date_naive());
                }
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            StockCommand::RegisterItem(cmd) => self.handle_register(cmd),
            StockCommand::ReceiveStock(cmd) => self.handle_receive(cmd),
            StockCommand::IssueStock(cmd) => self.handle_issue(cmd),
            StockCommand::ReconcileCount(cmd) => self.handle_reconcile(cmd),
        }
    }
}

impl StockItem {
    fn ensure_registered(&self, item_id: ItemId) -> Result<(), DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        if self.id != item_id {
            return Err(DomainError::invariant("item_id mismatch"));
        }
        Ok(())
    }

    fn handle_register(&self, cmd: &RegisterItem) -> Result<Vec<InventoryEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict("item already exists"));
        }
        if cmd.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if cmd.reference.trim().is_empty() {
            return Err(DomainError::validation("reference cannot be empty"));
        }
        if cmd.min_stock > cmd.max_stock {
            return Err(DomainError::validation("min_stock cannot exceed max_stock"));
        }

        let mut events = vec![InventoryEvent::ItemRegistered(ItemRegistered {
            item_id: cmd.item_id,
            name: cmd.name.trim().to_string(),
            reference: cmd.reference.trim().to_string(),
            category: cmd.category,
            location: cmd.location.clone(),
            supplier: cmd.supplier.clone(),
            min_stock: cmd.min_stock,
            max_stock: cmd.max_stock,
            occurred_at: cmd.occurred_at,
        })];

        if cmd.initial_stock > 0 {
            events.push(InventoryEvent::StockAdjusted(StockAdjusted {
                item_id: cmd.item_id,
                delta: i64::from(cmd.initial_stock),
                reason: AdjustmentReason::Receipt,
                note: Some("initial stock".to_string()),
                occurred_at: cmd.occurred_at,
            }));
        }

        Ok(events)
    }

    fn handle_receive(&self, cmd: &ReceiveStock) -> Result<Vec<InventoryEvent>, DomainError> {
        self.ensure_registered(cmd.item_id)?;

        if cmd.quantity == 0 {
            return Err(DomainError::validation("quantity must be greater than zero"));
        }
        if self.stock.checked_add(cmd.quantity).is_none() {
            return Err(DomainError::invariant("stock overflow"));
        }

        Ok(vec![InventoryEvent::StockAdjusted(StockAdjusted {
            item_id: cmd.item_id,
            delta: i64::from(cmd.quantity),
            reason: AdjustmentReason::Receipt,
            note: cmd.note.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_issue(&self, cmd: &IssueStock) -> Result<Vec<InventoryEvent>, DomainError> {
        self.ensure_registered(cmd.item_id)?;

        if cmd.quantity == 0 {
            return Err(DomainError::validation("quantity must be greater than zero"));
        }
        if cmd.quantity > self.stock {
            return Err(DomainError::invariant(format!(
                "insufficient stock (available: {}, requested: {})",
                self.stock, cmd.quantity
            )));
        }

        Ok(vec![InventoryEvent::StockAdjusted(StockAdjusted {
            item_id: cmd.item_id,
            delta: -i64::from(cmd.quantity),
            reason: AdjustmentReason::Issue,
            note: cmd.note.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_reconcile(&self, cmd: &ReconcileCount) -> Result<Vec<InventoryEvent>, DomainError> {
        self.ensure_registered(cmd.item_id)?;

        let delta = i64::from(cmd.counted) - i64::from(self.stock);
        if delta == 0 {
            return Ok(Vec::new());
        }

        Ok(vec![InventoryEvent::StockAdjusted(StockAdjusted {
            item_id: cmd.item_id,
            delta,
            reason: AdjustmentReason::InventoryCount,
            note: None,
            occurred_at: cmd.occurred_at,
        })])
    }
}
