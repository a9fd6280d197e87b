//! Lookup adapter: catalog response → canonical product match.

use serde::{Deserialize, Serialize};

use orderscan_core::CompanyId;
use orderscan_products::{
    BarcodeLookup, CatalogLookup, Product, ProductId, ProductType, StructuredPayload,
};

use crate::scan::result::ScanRejection;

/// Product resolved for a scan. Transient; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductMatch {
    pub product_id: ProductId,
    pub display_name: String,
    pub product_type: ProductType,
    /// Only set for stock-tracked products.
    pub qty_available: Option<i64>,
    pub uom: String,
    pub payload: Option<StructuredPayload>,
}

impl ProductMatch {
    pub fn from_product(product: &Product, payload: Option<StructuredPayload>) -> Self {
        Self {
            product_id: product.id_typed(),
            display_name: product.display_name(),
            product_type: product.product_type(),
            qty_available: product
                .is_stock_tracked()
                .then(|| product.qty_available()),
            uom: product.uom().to_string(),
            payload,
        }
    }

    pub fn is_stock_tracked(&self) -> bool {
        self.product_type == ProductType::Storable
    }

    /// Quantity to seed a new line with: the encoded quantity when positive, else 1.
    pub fn initial_quantity(&self) -> i64 {
        self.payload
            .as_ref()
            .and_then(StructuredPayload::encoded_quantity)
            .unwrap_or(1)
    }
}

/// Reduce the catalog's loosely shaped response to one identifier.
pub fn normalize(
    barcode: &str,
    lookup: BarcodeLookup,
) -> Result<(ProductId, Option<StructuredPayload>), ScanRejection> {
    let Some(product) = lookup.product else {
        // A blank collaborator error is treated as no error at all.
        let message = lookup
            .error
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| format!("No product found for barcode: {barcode}"));
        return Err(ScanRejection::product_not_found(message));
    };

    match product.product_id() {
        Some(id) => Ok((id, lookup.structured_payload)),
        None => Err(ScanRejection::product_unresolved()),
    }
}

/// Resolve a scanned code to a product match within the order's company.
pub fn resolve<C>(
    catalog: &C,
    barcode: &str,
    company_id: CompanyId,
) -> Result<ProductMatch, ScanRejection>
where
    C: CatalogLookup + ?Sized,
{
    let (product_id, payload) = normalize(barcode, catalog.resolve_barcode(barcode, company_id))?;

    // A canonical id the catalog cannot describe is as good as no id.
    let product = catalog
        .product(company_id, product_id)
        .ok_or_else(ScanRejection::product_unresolved)?;

    Ok(ProductMatch::from_product(&product, payload))
}
