//! Catalog lookup contract.
//!
//! The catalog service maps a raw barcode to a product identity plus optional
//! structured data decoded from the code. Its response is loosely shaped: the
//! product may come back as a nested record or as a bare identifier. Both are
//! modelled as variants of [`ProductRef`] so callers never inspect raw values.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use orderscan_core::{CompanyId, ValueObject};

use crate::product::{Product, ProductId};

/// Product identity as returned by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductRef {
    /// Bare identifier.
    Id(ProductId),
    /// Nested composite record; the identifier may be missing.
    Record(ProductRecordRef),
}

/// Composite product value returned by some catalog implementations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecordRef {
    #[serde(default)]
    pub id: Option<ProductId>,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl ProductRef {
    /// Canonical identifier, if one can be extracted.
    pub fn product_id(&self) -> Option<ProductId> {
        match self {
            ProductRef::Id(id) => Some(*id),
            ProductRef::Record(record) => record.id,
        }
    }
}

impl From<ProductId> for ProductRef {
    fn from(value: ProductId) -> Self {
        ProductRef::Id(value)
    }
}

/// Data encoded in the barcode beyond the product identity (e.g. GS1-128
/// application identifiers).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredPayload {
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub batch: Option<String>,
}

impl ValueObject for StructuredPayload {}

impl StructuredPayload {
    pub fn with_quantity(quantity: i64) -> Self {
        Self {
            quantity: Some(quantity),
            batch: None,
        }
    }

    /// Encoded quantity, only when strictly positive.
    pub fn encoded_quantity(&self) -> Option<i64> {
        self.quantity.filter(|q| *q > 0)
    }
}

/// Raw response of a barcode lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarcodeLookup {
    #[serde(default)]
    pub product: Option<ProductRef>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, alias = "gs1_data")]
    pub structured_payload: Option<StructuredPayload>,
}

impl BarcodeLookup {
    pub fn found(product: impl Into<ProductRef>) -> Self {
        Self {
            product: Some(product.into()),
            error: None,
            structured_payload: None,
        }
    }

    pub fn not_found(error: impl Into<String>) -> Self {
        Self {
            product: None,
            error: Some(error.into()),
            structured_payload: None,
        }
    }

    pub fn with_payload(mut self, payload: StructuredPayload) -> Self {
        self.structured_payload = Some(payload);
        self
    }
}

/// External catalog collaborator.
pub trait CatalogLookup: Send + Sync {
    /// Resolve a scanned code within a company's catalog.
    fn resolve_barcode(&self, barcode: &str, company_id: CompanyId) -> BarcodeLookup;

    /// Load a product by identifier.
    fn product(&self, company_id: CompanyId, product_id: ProductId) -> Option<Product>;
}

impl<S> CatalogLookup for Arc<S>
where
    S: CatalogLookup + ?Sized,
{
    fn resolve_barcode(&self, barcode: &str, company_id: CompanyId) -> BarcodeLookup {
        (**self).resolve_barcode(barcode, company_id)
    }

    fn product(&self, company_id: CompanyId, product_id: ProductId) -> Option<Product> {
        (**self).product(company_id, product_id)
    }
}
