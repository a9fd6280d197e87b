//! Product catalog backends.
//!
//! The catalog contract itself (`CatalogLookup`) lives in `orderscan-products`;
//! this module provides storage-backed implementations.

pub mod in_memory;

pub use in_memory::{CatalogError, InMemoryCatalog};
