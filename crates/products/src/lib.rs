//! Products/catalog domain module.
//!
//! Holds the product model consumed by order scanning and the contract of the
//! catalog lookup collaborator (barcode → product identity + structured data).
//! No IO, no HTTP, no storage.

pub mod catalog;
pub mod product;

pub use catalog::{BarcodeLookup, CatalogLookup, ProductRecordRef, ProductRef, StructuredPayload};
pub use product::{PricingMetadata, Product, ProductId, ProductType};
