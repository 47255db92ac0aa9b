use chrono::{Datelike, NaiveDate};

use optistock_core::{DomainError, DomainResult};

use crate::sale::{NewSale, SaleNumber, SaleRecord, SaleStatus};

/// In-memory sales register of the shop.
#[derive(Debug, Clone, Default)]
pub struct SalesRegister {
    sales: Vec<SaleRecord>,
}

impl SalesRegister {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new pending sale dated `date`.
    ///
    /// Numbering restarts every year: the n-th sale dated in a year gets
    /// `nnn = n`.
    pub fn record(&mut self, sale: NewSale, date: NaiveDate) -> DomainResult<&SaleRecord> {
        let year = date.year();
        let in_year = self.sales.iter().filter(|s| s.date().year() == year).count();
        let sequence = u32::try_from(in_year + 1)
            .map_err(|_| DomainError::invariant("sales register is full"))?;
        let number = SaleNumber::new(year, sequence);
        if self.get(&number).is_some() {
            return Err(DomainError::conflict(format!("sale {number} already exists")));
        }

        let record = SaleRecord::open(number, sale, date)?;
        tracing::info!(sale = %record.id(), client = record.client(), total = record.total(), "sale recorded");
        self.sales.push(record);
        Ok(&self.sales[self.sales.len() - 1])
    }

    pub fn get(&self, id: &SaleNumber) -> Option<&SaleRecord> {
        self.sales.iter().find(|s| s.id() == id)
    }

    pub fn list(&self) -> &[SaleRecord] {
        &self.sales
    }

    pub fn mark_paid(&mut self, id: &SaleNumber) -> DomainResult<()> {
        self.get_mut(id)?.mark_paid()
    }

    pub fn cancel(&mut self, id: &SaleNumber) -> DomainResult<()> {
        self.get_mut(id)?.cancel()
    }

    /// Case-insensitive search on sale number or client name.
    pub fn search(&self, term: &str) -> Vec<&SaleRecord> {
        let needle = term.trim().to_lowercase();
        self.sales
            .iter()
            .filter(|s| {
                needle.is_empty()
                    || s.id().as_str().to_lowercase().contains(&needle)
                    || s.client().to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Sum of every sale's total, whatever its status.
    pub fn total_sales(&self) -> u64 {
        self.sales.iter().map(SaleRecord::total).sum()
    }

    pub fn paid_count(&self) -> usize {
        self.sales
            .iter()
            .filter(|s| s.status() == SaleStatus::Paid)
            .count()
    }

    fn get_mut(&mut self, id: &SaleNumber) -> DomainResult<&mut SaleRecord> {
        self.sales
            .iter_mut()
            .find(|s| s.id() == id)
            .ok_or_else(DomainError::not_found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sale::PaymentMethod;

    fn sale(client: &str, total: u64) -> NewSale {
        NewSale {
            client: client.to_string(),
            products: vec!["Verres progressifs".to_string()],
            total,
            payment_method: PaymentMethod::Insurance,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn numbers_follow_recording_order() {
        let mut register = SalesRegister::new();
        let first = register.record(sale("Marie Dubois", 299), day(13)).unwrap().id().clone();
        let second = register.record(sale("Jean Martin", 650), day(12)).unwrap().id().clone();

        assert_eq!(first.as_str(), "VTE-2024-001");
        assert_eq!(second.as_str(), "VTE-2024-002");
    }

    #[test]
    fn numbering_restarts_each_year() {
        let mut register = SalesRegister::new();
        register.record(sale("Marie Dubois", 299), day(13)).unwrap();
        register.record(sale("Jean Martin", 650), day(14)).unwrap();

        let new_year = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let first = register.record(sale("Sophie Laurent", 45), new_year).unwrap();
        assert_eq!(first.id().as_str(), "VTE-2025-001");

        let third = register.record(sale("Luc Bernard", 120), day(20)).unwrap();
        assert_eq!(third.id().as_str(), "VTE-2024-003");
    }

    #[test]
    fn zero_total_sale_is_not_recorded() {
        let mut register = SalesRegister::new();
        assert!(matches!(
            register.record(sale("Marie Dubois", 0), day(13)),
            Err(DomainError::Validation(_))
        ));
        assert!(register.list().is_empty());
    }

    #[test]
    fn totals_and_paid_count() {
        let mut register = SalesRegister::new();
        let a = register.record(sale("Marie Dubois", 299), day(13)).unwrap().id().clone();
        register.record(sale("Jean Martin", 650), day(12)).unwrap();
        let c = register.record(sale("Sophie Laurent", 45), day(11)).unwrap().id().clone();

        register.mark_paid(&a).unwrap();
        register.mark_paid(&c).unwrap();

        assert_eq!(register.total_sales(), 994);
        assert_eq!(register.paid_count(), 2);
    }

    #[test]
    fn search_on_number_or_client() {
        let mut register = SalesRegister::new();
        register.record(sale("Marie Dubois", 299), day(13)).unwrap();
        register.record(sale("Jean Martin", 650), day(12)).unwrap();

        assert_eq!(register.search("martin").len(), 1);
        assert_eq!(register.search("vte-2024-001")[0].client(), "Marie Dubois");
        assert_eq!(register.search("").len(), 2);
    }

    #[test]
    fn unknown_sale_is_not_found() {
        let mut register = SalesRegister::new();
        assert_eq!(register.cancel(&SaleNumber::new(2024, 9)), Err(DomainError::NotFound));
    }

    #[test]
    fn cancelled_sale_cannot_be_paid() {
        let mut register = SalesRegister::new();
        let id = register.record(sale("Jean Martin", 650), day(12)).unwrap().id().clone();
        register.cancel(&id).unwrap();
        assert!(matches!(register.mark_paid(&id), Err(DomainError::Conflict(_))));
        assert_eq!(register.get(&id).unwrap().status(), SaleStatus::Cancelled);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 200,
                ..ProptestConfig::default()
            })]

            /// Property: every recorded sale gets a distinct number.
            #[test]
            fn numbers_are_unique(totals in prop::collection::vec(1u64..5_000, 1..50)) {
                let mut register = SalesRegister::new();
                for (i, total) in totals.iter().enumerate() {
                    register.record(sale(&format!("Client {i}"), *total), day(1)).unwrap();
                }
                let mut ids: Vec<_> = register.list().iter().map(|s| s.id().clone()).collect();
                ids.sort();
                ids.dedup();
                prop_assert_eq!(ids.len(), totals.len());
                prop_assert_eq!(register.total_sales(), totals.iter().sum::<u64>());
            }
        }
    }
}
