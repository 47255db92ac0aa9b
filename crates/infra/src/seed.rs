//! Sample catalog of the shop floor, used for demos and tests.

use chrono::{DateTime, Utc};

use optistock_core::ItemId;
use optistock_inventory::{ItemCategory, RegisterItem, StockCommand};

use crate::catalog::{CatalogResult, StockCatalog};

#[allow(clippy::too_many_arguments)]
fn item(
    id: u32,
    name: &str,
    reference: &str,
    category: ItemCategory,
    location: &str,
    supplier: Option<&str>,
    (min_stock, max_stock): (u32, u32),
    initial_stock: u32,
    occurred_at: DateTime<Utc>,
) -> RegisterItem {
    RegisterItem {
        item_id: ItemId::new(id),
        name: name.to_string(),
        reference: reference.to_string(),
        category,
        location: location.to_string(),
        supplier: supplier.map(str::to_string),
        min_stock,
        max_stock,
        initial_stock,
        occurred_at,
    }
}

/// Registration commands for the four sample entries.
pub fn sample_items(occurred_at: DateTime<Utc>) -> Vec<RegisterItem> {
    vec![
        item(1, "Ray-Ban Aviator Classic", "RB3025", ItemCategory::Frames, "A1-B2", Some("Luxottica"), (10, 50), 25, occurred_at),
        item(2, "Verres progressifs Varilux", "VAR-PROG", ItemCategory::Lenses, "B2-C1", Some("Essilor"), (5, 20), 3, occurred_at),
        item(3, "Lentilles journalières Acuvue", "ACU-DAILY", ItemCategory::ContactLenses, "C1-D2", Some("Johnson & Johnson"), (15, 100), 12, occurred_at),
        item(4, "Étui à lunettes cuir", "ETUI-001", ItemCategory::Accessories, "D1-A1", None, (5, 30), 0, occurred_at),
    ]
}

/// Register the sample entries into `catalog`.
pub fn seed_sample_catalog<C: StockCatalog + ?Sized>(catalog: &C) -> CatalogResult<()> {
    let now = Utc::now();
    for cmd in sample_items(now) {
        catalog.execute(StockCommand::RegisterItem(cmd))?;
    }
    tracing::debug!("sample catalog seeded");
    Ok(())
}
