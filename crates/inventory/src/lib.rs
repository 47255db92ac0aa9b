//! Inventory domain module.
//!
//! Business rules for the shop's stock, implemented purely as deterministic
//! domain logic (no IO, no storage):
//! - `item`: the event-sourced catalog entry and its stock movements
//! - `level`: replenishment status and stock-screen figures
//! - `count`: physical inventory count reconciliation
//! - `notice`: messages raised when a count is validated

pub mod count;
pub mod item;
pub mod level;
pub mod notice;

pub use count::{
    compute_aggregate_variance, compute_variance, format_signed, record_count, validate,
    CompletionRule, CountSession, InventoryLine, LineDifference, ValidationOutcome, VarianceStatus,
};
pub use item::{
    AdjustmentReason, InventoryEvent, IssueStock, ItemCategory, ItemRegistered, ReceiveStock,
    ReconcileCount, RegisterItem, StockAdjusted, StockCommand, StockItem, StockItemSnapshot,
    AGGREGATE_TYPE,
};
pub use level::{search, StockLevel, StockSummary};
pub use notice::Notice;
