//! Inventory count workflow on top of the catalog.
//!
//! The service seeds a [`CountSession`] from catalog snapshots, routes typed
//! counts through the configured input policy and, once every line is
//! accounted for, sets each entry's quantity of record to its count with a
//! `ReconcileCount` command before closing the session.

use chrono::Utc;
use serde::Serialize;

use optistock_core::{DomainError, ItemId};
use optistock_inventory::{
    CountSession, LineDifference, Notice, ReconcileCount, StockCommand, StockSummary,
    ValidationOutcome,
};

use crate::catalog::{CatalogResult, StockCatalog};
use crate::config::CountConfig;

/// What a validation attempt produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountReport {
    pub outcome: ValidationOutcome,
    pub notice: Notice,
    /// Aggregate variance just before validation.
    pub aggregate_variance: i64,
    /// Number of catalog entries whose quantity of record changed.
    pub adjusted_items: usize,
}

impl CountReport {
    pub fn differences(&self) -> &[LineDifference] {
        self.outcome.differences()
    }
}

#[derive(Debug)]
pub struct InventoryCountService<C> {
    catalog: C,
    config: CountConfig,
}

impl<C> InventoryCountService<C>
where
    C: StockCatalog,
{
    pub fn new(catalog: C, config: CountConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn config(&self) -> &CountConfig {
        &self.config
    }

    /// Open a session over the whole catalog, every count at 0.
    pub fn start_session(&self) -> CatalogResult<CountSession> {
        let items = self.catalog.list()?;
        let session = CountSession::seed(&items, self.config.completion_rule)?;
        tracing::info!(lines = items.len(), rule = ?self.config.completion_rule, "inventory session started");
        Ok(session)
    }

    /// Record a count as typed by the user.
    ///
    /// In lenient mode the input is coerced and unknown lines are ignored
    /// (`Ok(false)`). In strict mode both are errors.
    pub fn record_count(
        &self,
        session: &mut CountSession,
        line_id: ItemId,
        raw: &str,
    ) -> CatalogResult<bool> {
        if !self.config.strict_counts {
            return Ok(session.record_count_input(line_id, raw));
        }

        let quantity = raw
            .trim()
            .parse::<i64>()
            .map_err(|_| DomainError::validation(format!("count for item {line_id} is not a number")))?;
        session.try_record_count(line_id, quantity)?;
        Ok(true)
    }

    /// Validate the session and, when it closes, adjust the catalog.
    ///
    /// Every line is reconciled, not only the ones that differ from the
    /// session seed, so movements recorded after `start_session` are
    /// overwritten by the count. The catalog is written before the session
    /// closes: a failed write leaves the counts in place and the commit can
    /// be retried.
    pub fn commit(&self, session: &mut CountSession) -> CatalogResult<CountReport> {
        let aggregate_variance = session.aggregate_variance();

        let mut adjusted_items = 0;
        let (completed, total) = session.progress();
        if completed == total {
            let occurred_at = Utc::now();
            for line in session.lines() {
                let recorded = self.catalog.execute(StockCommand::ReconcileCount(ReconcileCount {
                    item_id: line.id(),
                    counted: line.counted_stock(),
                    occurred_at,
                }))?;
                if !recorded.is_empty() {
                    adjusted_items += 1;
                }
            }
        }

        let outcome = session.validate();
        if outcome.is_committed() {
            tracing::info!(adjusted_items, aggregate_variance, "inventory committed to catalog");
        }

        let notice = outcome.notice();
        Ok(CountReport {
            outcome,
            notice,
            aggregate_variance,
            adjusted_items,
        })
    }

    /// Discard a session; the catalog is left as it was.
    pub fn cancel(&self, session: CountSession) {
        session.cancel();
    }

    pub fn stock_summary(&self) -> CatalogResult<StockSummary> {
        let items = self.catalog.list()?;
        Ok(StockSummary::compute(&items, self.config.unit_value))
    }
}
