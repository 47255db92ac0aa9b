//! Physical inventory count reconciliation.
//!
//! A count session holds one [`InventoryLine`] per catalog entry. Staff enter
//! the quantity they physically found; the session computes the variance
//! against the quantity of record and refuses to close until every line is
//! accounted for.
//!
//! Variance sign convention: `counted - system`. Positive is a surplus,
//! negative a shortfall.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use optistock_core::{DomainError, DomainResult, ItemId};

use crate::item::{ItemCategory, StockItemSnapshot};
use crate::notice::Notice;

/// When a line counts as "done" for validation purposes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionRule {
    /// `counted > 0 || system == 0`.
    ///
    /// A genuine zero count on a stocked item cannot be told apart from a
    /// line nobody touched, so such a line stays incomplete.
    #[default]
    Legacy,
    /// Complete once a count has been recorded for the line, zero included.
    /// Zero-stock lines are complete without a count.
    ExplicitCount,
}

/// One catalog entry under count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryLine {
    id: ItemId,
    name: String,
    reference: String,
    category: ItemCategory,
    location: String,
    system_stock: u32,
    counted_stock: u32,
    counted: bool,
}

impl InventoryLine {
    pub fn new(
        id: ItemId,
        name: impl Into<String>,
        reference: impl Into<String>,
        category: ItemCategory,
        location: impl Into<String>,
        system_stock: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            reference: reference.into(),
            category,
            location: location.into(),
            system_stock,
            counted_stock: 0,
            counted: false,
        }
    }

    pub fn from_snapshot(item: &StockItemSnapshot) -> Self {
        Self::new(
            item.id,
            item.name.clone(),
            item.reference.clone(),
            item.category,
            item.location.clone(),
            item.stock,
        )
    }

    pub fn id(&self) -> ItemId {
        self.id
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

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn system_stock(&self) -> u32 {
        self.system_stock
    }

    pub fn counted_stock(&self) -> u32 {
        self.counted_stock
    }

    /// Whether a count was entered for this line in the current session.
    pub fn has_count(&self) -> bool {
        self.counted
    }

    pub fn variance(&self) -> i64 {
        compute_variance(self)
    }

    pub fn status(&self) -> VarianceStatus {
        VarianceStatus::from_variance(self.variance())
    }

    pub fn is_complete(&self, rule: CompletionRule) -> bool {
        match rule {
            CompletionRule::Legacy => self.counted_stock > 0 || self.system_stock == 0,
            CompletionRule::ExplicitCount => self.counted || self.system_stock == 0,
        }
    }

    fn set_count(&mut self, quantity: u32) {
        self.counted_stock = quantity;
        self.counted = true;
    }

    /// Close the line after a successful validation: the count becomes the
    /// quantity of record and the entry is cleared for the next session.
    fn close(&mut self) {
        self.system_stock = self.counted_stock;
        self.counted_stock = 0;
        self.counted = false;
    }
}

/// Classification of a single line's variance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "variance", rename_all = "snake_case")]
pub enum VarianceStatus {
    Conforming,
    /// Carries the (positive) variance.
    Surplus(i64),
    /// Carries the (negative) variance.
    Shortfall(i64),
}

impl VarianceStatus {
    pub fn from_variance(variance: i64) -> Self {
        match variance {
            0 => VarianceStatus::Conforming,
            v if v > 0 => VarianceStatus::Surplus(v),
            v => VarianceStatus::Shortfall(v),
        }
    }

    pub fn is_conforming(self) -> bool {
        self == VarianceStatus::Conforming
    }
}

impl core::fmt::Display for VarianceStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            VarianceStatus::Conforming => f.write_str("Conforme"),
            VarianceStatus::Surplus(v) | VarianceStatus::Shortfall(v) => {
                f.write_str(&format_signed(*v))
            }
        }
    }
}

/// Render a variance with an explicit `+` for surpluses.
pub fn format_signed(variance: i64) -> String {
    if variance > 0 {
        format!("+{variance}")
    } else {
        variance.to_string()
    }
}

/// Snapshot of a line that did not match at validation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineDifference {
    pub id: ItemId,
    pub name: String,
    pub reference: String,
    pub system_stock: u32,
    pub counted_stock: u32,
    pub variance: i64,
}

impl From<&InventoryLine> for LineDifference {
    fn from(line: &InventoryLine) -> Self {
        Self {
            id: line.id,
            name: line.name.clone(),
            reference: line.reference.clone(),
            system_stock: line.system_stock,
            counted_stock: line.counted_stock,
            variance: line.variance(),
        }
    }
}

/// Result of [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ValidationOutcome {
    /// Some lines are still uncounted; nothing changed.
    Blocked { completed: usize, total: usize },
    /// The count was closed. `differences` lists the lines that moved.
    Committed { differences: Vec<LineDifference> },
}

impl ValidationOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, ValidationOutcome::Committed { .. })
    }

    pub fn differences(&self) -> &[LineDifference] {
        match self {
            ValidationOutcome::Committed { differences } => differences,
            ValidationOutcome::Blocked { .. } => &[],
        }
    }

    pub fn notice(&self) -> Notice {
        match self {
            ValidationOutcome::Blocked { completed, total } => Notice::IncompleteWarning {
                completed: *completed,
                total: *total,
            },
            ValidationOutcome::Committed { differences } if differences.is_empty() => {
                Notice::NoVarianceConfirmation
            }
            ValidationOutcome::Committed { differences } => Notice::VarianceSummary {
                count: differences.len(),
            },
        }
    }
}

/// `counted - system` for one line.
pub fn compute_variance(line: &InventoryLine) -> i64 {
    i64::from(line.counted_stock) - i64::from(line.system_stock)
}

/// Sum of every line's variance. Display only; it never gates validation.
pub fn compute_aggregate_variance(lines: &[InventoryLine]) -> i64 {
    lines.iter().map(compute_variance).sum()
}

/// Set a line's count. Negative quantities are taken as 0 and an unknown id
/// is ignored. Returns whether a line was updated.
pub fn record_count(lines: &mut [InventoryLine], line_id: ItemId, quantity: i64) -> bool {
    let Some(line) = lines.iter_mut().find(|l| l.id == line_id) else {
        tracing::warn!(%line_id, "count ignored: no such line");
        return false;
    };

    let quantity = u32::try_from(quantity.max(0)).unwrap_or(u32::MAX);
    line.set_count(quantity);
    tracing::debug!(%line_id, counted = quantity, system = line.system_stock, "count recorded");
    true
}

/// Count completion and close the session when everything is accounted for.
///
/// A blocked validation leaves every line untouched.
pub fn validate(lines: &mut [InventoryLine], rule: CompletionRule) -> ValidationOutcome {
    let total = lines.len();
    let completed = lines.iter().filter(|l| l.is_complete(rule)).count();

    if completed < total {
        tracing::warn!(completed, total, "inventory validation blocked");
        return ValidationOutcome::Blocked { completed, total };
    }

    let differences: Vec<LineDifference> = lines
        .iter()
        .filter(|l| l.variance() != 0)
        .map(LineDifference::from)
        .collect();

    for line in lines.iter_mut() {
        line.close();
    }

    tracing::info!(total, differences = differences.len(), "inventory validated");
    ValidationOutcome::Committed { differences }
}

/// Leading-integer parse of a form field: `"12"`, `" 7 pcs"`, `"-3"`.
fn parse_count_input(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // Only ASCII digits remain, so parsing can fail on overflow alone.
    let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

/// One count session over a set of catalog entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountSession {
    lines: Vec<InventoryLine>,
    rule: CompletionRule,
}

impl CountSession {
    pub fn new(lines: Vec<InventoryLine>, rule: CompletionRule) -> DomainResult<Self> {
        let mut seen = HashSet::with_capacity(lines.len());
        for line in &lines {
            if !seen.insert(line.id) {
                return Err(DomainError::validation(format!(
                    "duplicate inventory line {}",
                    line.id
                )));
            }
        }
        Ok(Self { lines, rule })
    }

    /// Start a session from the catalog's current quantities, counts at 0.
    pub fn seed<'a, I>(items: I, rule: CompletionRule) -> DomainResult<Self>
    where
        I: IntoIterator<Item = &'a StockItemSnapshot>,
    {
        let lines = items.into_iter().map(InventoryLine::from_snapshot).collect();
        Self::new(lines, rule)
    }

    pub fn rule(&self) -> CompletionRule {
        self.rule
    }

    pub fn lines(&self) -> &[InventoryLine] {
        &self.lines
    }

    pub fn line(&self, id: ItemId) -> Option<&InventoryLine> {
        self.lines.iter().find(|l| l.id == id)
    }

    pub fn record_count(&mut self, line_id: ItemId, quantity: i64) -> bool {
        record_count(&mut self.lines, line_id, quantity)
    }

    /// Record a count typed into a form field. Unparsable input counts as 0.
    pub fn record_count_input(&mut self, line_id: ItemId, raw: &str) -> bool {
        let quantity = parse_count_input(raw).unwrap_or(0);
        self.record_count(line_id, quantity)
    }

    /// Strict variant of [`CountSession::record_count`].
    pub fn try_record_count(&mut self, line_id: ItemId, quantity: i64) -> DomainResult<()> {
        if quantity < 0 {
            return Err(DomainError::validation("count cannot be negative"));
        }
        let quantity = u32::try_from(quantity)
            .map_err(|_| DomainError::validation("count is too large"))?;
        let line = self
            .lines
            .iter_mut()
            .find(|l| l.id == line_id)
            .ok_or_else(DomainError::not_found)?;
        line.set_count(quantity);
        Ok(())
    }

    /// `(completed, total)` under the session's completion rule.
    pub fn progress(&self) -> (usize, usize) {
        let completed = self.lines.iter().filter(|l| l.is_complete(self.rule)).count();
        (completed, self.lines.len())
    }

    pub fn aggregate_variance(&self) -> i64 {
        compute_aggregate_variance(&self.lines)
    }

    pub fn validate(&mut self) -> ValidationOutcome {
        validate(&mut self.lines, self.rule)
    }

    /// Discard the session without touching the catalog.
    pub fn cancel(self) {
        let (completed, total) = self.progress();
        tracing::info!(completed, total, "inventory session cancelled");
    }
}
