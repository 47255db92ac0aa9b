//! Client register of the shop: contact details, prescription notes and
//! last visit, searchable by name or email.

pub mod client;
pub mod register;

pub use client::{Client, ClientDetails, ClientStatus};
pub use register::ClientRegister;
