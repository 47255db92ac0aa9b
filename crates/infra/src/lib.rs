//! Infrastructure layer: catalog storage, count workflow, configuration.

pub mod catalog;
pub mod config;
pub mod count_service;
pub mod seed;

pub use catalog::{CatalogError, CatalogResult, InMemoryStockCatalog, StockCatalog};
pub use config::CountConfig;
pub use count_service::{CountReport, InventoryCountService};
pub use seed::{sample_items, seed_sample_catalog};
