use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use optistock_core::{DomainError, DomainResult};

/// Sale number, `VTE-<year>-<nnn>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaleNumber(String);

impl SaleNumber {
    /// Build the number of the `sequence`-th sale of `year` (1-based).
    pub fn new(year: i32, sequence: u32) -> Self {
        Self(format!("VTE-{year}-{sequence:03}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for SaleNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl core::str::FromStr for SaleNumber {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().splitn(3, '-');
        let (Some("VTE"), Some(year), Some(seq)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(DomainError::invalid_id(format!("SaleNumber: {s}")));
        };
        let year = year
            .parse::<i32>()
            .map_err(|e| DomainError::invalid_id(format!("SaleNumber year: {e}")))?;
        let seq = seq
            .parse::<u32>()
            .map_err(|e| DomainError::invalid_id(format!("SaleNumber sequence: {e}")))?;
        Ok(Self::new(year, seq))
    }
}

/// Payment lifecycle of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    Pending,
    Paid,
    Cancelled,
}

impl SaleStatus {
    pub fn label(self) -> &'static str {
        match self {
            SaleStatus::Pending => "En attente",
            SaleStatus::Paid => "Payée",
            SaleStatus::Cancelled => "Annulée",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    Cash,
    /// Paid by the client's complementary health insurance.
    Insurance,
    Cheque,
}

impl PaymentMethod {
    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Card => "Carte bancaire",
            PaymentMethod::Cash => "Espèces",
            PaymentMethod::Insurance => "Mutuelle",
            PaymentMethod::Cheque => "Chèque",
        }
    }
}

/// Input of a new sale, before it gets a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSale {
    pub client: String,
    pub products: Vec<String>,
    /// Whole euros.
    pub total: u64,
    pub payment_method: PaymentMethod,
}

impl NewSale {
    pub fn validate(&self) -> DomainResult<()> {
        if self.client.trim().is_empty() {
            return Err(DomainError::validation("client cannot be empty"));
        }
        if self.products.iter().all(|p| p.trim().is_empty()) {
            return Err(DomainError::validation("a sale needs at least one product"));
        }
        if self.total == 0 {
            return Err(DomainError::validation("sale total must be positive"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    id: SaleNumber,
    client: String,
    date: NaiveDate,
    products: Vec<String>,
    total: u64,
    status: SaleStatus,
    payment_method: PaymentMethod,
}

impl SaleRecord {
    pub fn open(id: SaleNumber, sale: NewSale, date: NaiveDate) -> DomainResult<Self> {
        sale.validate()?;
        Ok(Self {
            id,
            client: sale.client.trim().to_string(),
            date,
            products: sale
                .products
                .into_iter()
                .filter(|p| !p.trim().is_empty())
                .collect(),
            total: sale.total,
            status: SaleStatus::Pending,
            payment_method: sale.payment_method,
        })
    }

    pub fn id(&self) -> &SaleNumber {
        &self.id
    }

    pub fn client(&self) -> &str {
        &self.client
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn products(&self) -> &[String] {
        &self.products
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn status(&self) -> SaleStatus {
        self.status
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    pub fn mark_paid(&mut self) -> DomainResult<()> {
        self.transition(SaleStatus::Paid)
    }

    pub fn cancel(&mut self) -> DomainResult<()> {
        self.transition(SaleStatus::Cancelled)
    }

    fn transition(&mut self, next: SaleStatus) -> DomainResult<()> {
        if self.status != SaleStatus::Pending {
            return Err(DomainError::conflict(format!(
                "sale {} is already {:?}",
                self.id, self.status
            )));
        }
        self.status = next;
        Ok(())
    }
}
