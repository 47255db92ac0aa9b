//! Stock level classification and catalog-wide stock figures.

use serde::{Deserialize, Serialize};

use crate::item::StockItemSnapshot;

/// Replenishment status of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    OutOfStock,
    Critical,
    Low,
    Normal,
}

impl StockLevel {
    /// Classify the current quantity against the reorder threshold.
    ///
    /// `Low` covers quantities up to one and a half times the threshold.
    pub fn classify(current: u32, min_stock: u32) -> Self {
        if current == 0 {
            return StockLevel::OutOfStock;
        }
        if current <= min_stock {
            return StockLevel::Critical;
        }
        if u64::from(current) * 2 <= u64::from(min_stock) * 3 {
            return StockLevel::Low;
        }
        StockLevel::Normal
    }

    pub fn of(item: &StockItemSnapshot) -> Self {
        Self::classify(item.stock, item.min_stock)
    }

    pub fn label(self) -> &'static str {
        match self {
            StockLevel::OutOfStock => "Rupture",
            StockLevel::Critical => "Critique",
            StockLevel::Low => "Faible",
            StockLevel::Normal => "Normal",
        }
    }

    pub fn needs_restock(self) -> bool {
        matches!(self, StockLevel::OutOfStock | StockLevel::Critical)
    }
}

/// Case-insensitive search on name or reference.
pub fn search<'a>(items: &'a [StockItemSnapshot], term: &str) -> Vec<&'a StockItemSnapshot> {
    let needle = term.trim().to_lowercase();
    items
        .iter()
        .filter(|item| {
            needle.is_empty()
                || item.name.to_lowercase().contains(&needle)
                || item.reference.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Headline figures of the stock screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockSummary {
    pub total_items: usize,
    /// Items at or below their reorder threshold (out of stock included).
    pub critical_items: usize,
    /// Estimated value in whole euros.
    pub estimated_value: u64,
}

impl StockSummary {
    pub fn compute(items: &[StockItemSnapshot], unit_value: u64) -> Self {
        Self {
            total_items: items.len(),
            critical_items: items
                .iter()
                .filter(|item| StockLevel::of(item).needs_restock())
                .count(),
            estimated_value: items
                .iter()
                .map(|item| u64::from(item.stock).saturating_mul(unit_value))
                .fold(0u64, u64::saturating_add),
        }
    }
}
