use std::sync::Arc;

use chrono::Utc;
use optistock_core::ItemId;
use optistock_infra::{
    seed_sample_catalog, CountConfig, InMemoryStockCatalog, InventoryCountService, StockCatalog,
};
use optistock_inventory::{
    AdjustmentReason, InventoryEvent, IssueStock, Notice, ReceiveStock, StockCommand, StockLevel,
    ValidationOutcome,
};

fn shop() -> InventoryCountService<Arc<InMemoryStockCatalog>> {
    let catalog = Arc::new(InMemoryStockCatalog::new());
    seed_sample_catalog(&catalog).expect("sample catalog registers");
    InventoryCountService::new(catalog, CountConfig::default())
}

fn stock_of(svc: &InventoryCountService<Arc<InMemoryStockCatalog>>, id: u32) -> u32 {
    svc.catalog().get(ItemId::new(id)).unwrap().unwrap().stock
}

#[test]
fn full_count_adjusts_catalog_and_journal() {
    let svc = shop();
    let mut session = svc.start_session().unwrap();

    // Frames match, lenses over-counted, contact lenses short.
    svc.record_count(&mut session, ItemId::new(1), "25").unwrap();
    svc.record_count(&mut session, ItemId::new(2), "5").unwrap();
    svc.record_count(&mut session, ItemId::new(3), "10").unwrap();

    assert_eq!(session.line(ItemId::new(2)).unwrap().status().to_string(), "+2");
    assert_eq!(session.aggregate_variance(), 0);

    let report = svc.commit(&mut session).unwrap();
    assert_eq!(report.notice, Notice::VarianceSummary { count: 2 });
    assert_eq!(report.adjusted_items, 2);
    assert_eq!(
        report.notice.description(),
        "2 écart(s) détecté(s) et ajusté(s)"
    );

    assert_eq!(stock_of(&svc, 1), 25);
    assert_eq!(stock_of(&svc, 2), 5);
    assert_eq!(stock_of(&svc, 3), 10);

    let journal = svc.catalog().events_for(ItemId::new(3)).unwrap();
    match journal.last().map(|e| e.payload()) {
        Some(InventoryEvent::StockAdjusted(e)) => {
            assert_eq!(e.delta, -2);
            assert_eq!(e.reason, AdjustmentReason::InventoryCount);
        }
        other => panic!("Expected count adjustment, got {other:?}"),
    }
}

#[test]
fn next_session_requires_fresh_counts() {
    let svc = shop();
    let mut session = svc.start_session().unwrap();
    for id in 1..=3 {
        let system = session.line(ItemId::new(id)).unwrap().system_stock();
        svc.record_count(&mut session, ItemId::new(id), &system.to_string())
            .unwrap();
    }

    let report = svc.commit(&mut session).unwrap();
    assert_eq!(report.notice, Notice::NoVarianceConfirmation);
    assert_eq!(report.adjusted_items, 0);

    let again = svc.commit(&mut session).unwrap();
    assert_eq!(
        again.outcome,
        ValidationOutcome::Blocked { completed: 1, total: 4 }
    );
    assert!(again.notice.is_destructive());
}

#[test]
fn movements_between_sessions_are_reflected_in_the_next_seed() {
    let svc = shop();
    let catalog = svc.catalog();

    catalog
        .execute(StockCommand::ReceiveStock(ReceiveStock {
            item_id: ItemId::new(4),
            quantity: 6,
            note: Some("Réception commande fournisseur".to_string()),
            occurred_at: Utc::now(),
        }))
        .unwrap();
    catalog
        .execute(StockCommand::IssueStock(IssueStock {
            item_id: ItemId::new(2),
            quantity: 3,
            note: Some("Vente client".to_string()),
            occurred_at: Utc::now(),
        }))
        .unwrap();

    let item_2 = catalog.get(ItemId::new(2)).unwrap().unwrap();
    assert_eq!(StockLevel::of(&item_2), StockLevel::OutOfStock);

    let session = svc.start_session().unwrap();
    assert_eq!(session.line(ItemId::new(4)).unwrap().system_stock(), 6);
    assert_eq!(session.line(ItemId::new(2)).unwrap().system_stock(), 0);
    // Item 2 is now empty, item 4 is now stocked.
    assert_eq!(session.progress(), (1, 4));
}

#[test]
fn count_overrides_movements_made_during_the_session() {
    let svc = shop();
    let mut session = svc.start_session().unwrap();

    svc.catalog()
        .execute(StockCommand::ReceiveStock(ReceiveStock {
            item_id: ItemId::new(1),
            quantity: 5,
            note: None,
            occurred_at: Utc::now(),
        }))
        .unwrap();
    assert_eq!(stock_of(&svc, 1), 30);

    for (id, qty) in [(1, "25"), (2, "3"), (3, "12")] {
        svc.record_count(&mut session, ItemId::new(id), qty).unwrap();
    }
    let report = svc.commit(&mut session).unwrap();

    // The session saw no variance, but the catalog had moved.
    assert_eq!(report.notice, Notice::NoVarianceConfirmation);
    assert_eq!(report.adjusted_items, 1);
    assert_eq!(stock_of(&svc, 1), 25);

    let journal = svc.catalog().events_for(ItemId::new(1)).unwrap();
    match journal.last().map(|e| e.payload()) {
        Some(InventoryEvent::StockAdjusted(e)) => {
            assert_eq!(e.delta, -5);
            assert_eq!(e.reason, AdjustmentReason::InventoryCount);
        }
        other => panic!("Expected count adjustment, got {other:?}"),
    }
}
