//! Sales domain module.
//!
//! Point-of-sale records of the shop: a cart that totals the selected
//! products, numbered sales with a fixed payment status lifecycle, kept in an
//! in-memory register.

pub mod cart;
pub mod register;
pub mod sale;

pub use cart::{Cart, CartLine};
pub use register::SalesRegister;
pub use sale::{NewSale, PaymentMethod, SaleNumber, SaleRecord, SaleStatus};
