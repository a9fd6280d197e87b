//! Infrastructure layer: collaborator implementations and scan orchestration.

pub mod catalog;
pub mod config;
pub mod order_store;
pub mod scan_resolver;


pub use catalog::{CatalogError, InMemoryCatalog};
pub use config::{EnvConfigStore, InMemoryConfigStore};
pub use order_store::{InMemoryOrderStore, NewOrderLine, OrderStore, OrderStoreError};
pub use scan_resolver::{ScanError, ScanResolver};
