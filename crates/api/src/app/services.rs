//! Collaborator wiring for the HTTP layer.
//!
//! Everything is in-memory: the catalog, the order store (which defaults new
//! lines from the catalog) and the scan resolver share one catalog instance.

use std::sync::Arc;

use orderscan_infra::{EnvConfigStore, InMemoryCatalog, InMemoryOrderStore, ScanResolver};
use orderscan_sales::ConfigStore;

pub type OrderStoreHandle = Arc<InMemoryOrderStore<Arc<InMemoryCatalog>>>;

pub type Resolver = ScanResolver<OrderStoreHandle, Arc<InMemoryCatalog>, Arc<dyn ConfigStore>>;

pub struct AppServices {
    pub catalog: Arc<InMemoryCatalog>,
    pub orders: OrderStoreHandle,
    pub resolver: Resolver,
}

impl AppServices {
    pub fn new(config: Arc<dyn ConfigStore>) -> Self {
        let catalog = Arc::new(InMemoryCatalog::new());
        let orders: OrderStoreHandle = Arc::new(InMemoryOrderStore::new(catalog.clone()));
        let resolver = ScanResolver::new(orders.clone(), catalog.clone(), config);
        Self {
            catalog,
            orders,
            resolver,
        }
    }
}

/// Production wiring: scan settings come from `ORDERSCAN_*` env vars.
pub fn build_services() -> AppServices {
    AppServices::new(Arc::new(EnvConfigStore::new()))
}
