use serde::{Deserialize, Serialize};

use optistock_core::{DomainError, DomainResult, ItemId};

use crate::sale::{NewSale, PaymentMethod};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ItemId,
    pub name: String,
    /// Whole euros.
    pub unit_price: u64,
    pub quantity: u32,
}

impl CartLine {
    pub fn subtotal(&self) -> u64 {
        self.unit_price.saturating_mul(u64::from(self.quantity))
    }
}

/// Point-of-sale cart, one line per product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add one unit of a product. A product already in the cart gets its
    /// quantity bumped instead of a second line.
    pub fn add(&mut self, product_id: ItemId, name: impl Into<String>, unit_price: u64) -> DomainResult<()> {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity = line.quantity.saturating_add(1);
            return Ok(());
        }

        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("cart product needs a name"));
        }
        self.lines.push(CartLine {
            product_id,
            name,
            unit_price,
            quantity: 1,
        });
        Ok(())
    }

    /// Returns whether a line was removed.
    pub fn remove(&mut self, product_id: ItemId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);
        self.lines.len() != before
    }

    /// Set a line's quantity; zero or less removes the line. Returns whether
    /// the product was in the cart.
    pub fn update_quantity(&mut self, product_id: ItemId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove(product_id);
        }
        match self.lines.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => {
                line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
                true
            }
            None => false,
        }
    }

    /// Sum of `unit_price × quantity` over every line.
    pub fn total(&self) -> u64 {
        self.lines
            .iter()
            .map(CartLine::subtotal)
            .fold(0, u64::saturating_add)
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Turn the cart into a sale for `client`, leaving the cart empty.
    ///
    /// On error the cart is kept as it was.
    pub fn checkout(&mut self, client: &str, payment_method: PaymentMethod) -> DomainResult<NewSale> {
        if self.is_empty() {
            return Err(DomainError::validation("cart is empty"));
        }

        let sale = NewSale {
            client: client.to_string(),
            products: self
                .lines
                .iter()
                .map(|l| match l.quantity {
                    1 => l.name.clone(),
                    n => format!("{} x{n}", l.name),
                })
                .collect(),
            total: self.total(),
            payment_method,
        };
        sale.validate()?;

        tracing::debug!(lines = self.lines.len(), total = sale.total, "cart checked out");
        self.clear();
        Ok(sale)
    }
}
