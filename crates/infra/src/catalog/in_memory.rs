use std::collections::HashMap;
use std::sync::RwLock;

use orderscan_core::CompanyId;
use orderscan_products::{
    BarcodeLookup, CatalogLookup, Product, ProductId, ProductRef, StructuredPayload,
};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("barcode cannot be empty")]
    EmptyBarcode,
    #[error("catalog lock poisoned")]
    LockPoisoned,
}

#[derive(Debug, Clone)]
struct BarcodeEntry {
    product: ProductRef,
    payload: Option<StructuredPayload>,
}

#[derive(Debug, Default)]
struct CatalogState {
    products: HashMap<(CompanyId, ProductId), Product>,
    barcodes: HashMap<(CompanyId, String), BarcodeEntry>,
}

/// In-memory, company-isolated product catalog for tests/dev.
///
/// Barcodes are registered per company. A registration may point at a bare
/// product id or at a nested record, so both response shapes of the lookup
/// contract can be exercised.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    inner: RwLock<CatalogState>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_product(&self, product: Product) -> Result<(), CatalogError> {
        let mut state = self.inner.write().map_err(|_| CatalogError::LockPoisoned)?;
        state
            .products
            .insert((product.company_id(), product.id_typed()), product);
        Ok(())
    }

    /// Map `barcode` to a product reference within `company_id`.
    ///
    /// Re-registering a barcode replaces the previous mapping.
    pub fn register_barcode(
        &self,
        company_id: CompanyId,
        barcode: &str,
        product: impl Into<ProductRef>,
        payload: Option<StructuredPayload>,
    ) -> Result<(), CatalogError> {
        let barcode = barcode.trim();
        if barcode.is_empty() {
            return Err(CatalogError::EmptyBarcode);
        }

        let mut state = self.inner.write().map_err(|_| CatalogError::LockPoisoned)?;
        state.barcodes.insert(
            (company_id, barcode.to_string()),
            BarcodeEntry {
                product: product.into(),
                payload,
            },
        );
        Ok(())
    }

    /// Register a product together with its plain barcodes.
    pub fn add_product<I, B>(&self, product: Product, barcodes: I) -> Result<(), CatalogError>
    where
        I: IntoIterator<Item = B>,
        B: AsRef<str>,
    {
        let company_id = product.company_id();
        let product_id = product.id_typed();
        self.insert_product(product)?;
        for barcode in barcodes {
            self.register_barcode(company_id, barcode.as_ref(), product_id, None)?;
        }
        Ok(())
    }

    pub fn list(&self, company_id: CompanyId) -> Vec<Product> {
        let state = match self.inner.read() {
            Ok(s) => s,
            Err(_) => return vec![],
        };

        let mut products: Vec<Product> = state
            .products
            .iter()
            .filter_map(|((c, _id), p)| if *c == company_id { Some(p.clone()) } else { None })
            .collect();
        products.sort_by(|a, b| a.name().cmp(b.name()));
        products
    }
}

impl CatalogLookup for InMemoryCatalog {
    fn resolve_barcode(&self, barcode: &str, company_id: CompanyId) -> BarcodeLookup {
        let barcode = barcode.trim();
        if barcode.is_empty() {
            return BarcodeLookup::not_found("Empty barcode");
        }

        let state = match self.inner.read() {
            Ok(s) => s,
            Err(_) => return BarcodeLookup::not_found("Catalog unavailable"),
        };

        match state.barcodes.get(&(company_id, barcode.to_string())) {
            Some(entry) => {
                let lookup = BarcodeLookup::found(entry.product.clone());
                match &entry.payload {
                    Some(payload) => lookup.with_payload(payload.clone()),
                    None => lookup,
                }
            }
            None => BarcodeLookup::default(),
        }
    }

    fn product(&self, company_id: CompanyId, product_id: ProductId) -> Option<Product> {
        let state = self.inner.read().ok()?;
        state.products.get(&(company_id, product_id)).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderscan_core::AggregateId;
    use orderscan_products::{ProductRecordRef, ProductType};

    fn widget(company_id: CompanyId) -> Product {
        Product::new(
            ProductId::new(AggregateId::new()),
            company_id,
            "Widget",
            ProductType::Storable,
        )
        .unwrap()
    }

    #[test]
    fn registered_barcode_resolves_to_bare_id() {
        let catalog = InMemoryCatalog::new();
        let company_id = CompanyId::new();
        let product = widget(company_id);
        let product_id = product.id_typed();
        catalog.add_product(product, ["0123456789012"]).unwrap();

        let lookup = catalog.resolve_barcode("0123456789012", company_id);
        assert_eq!(lookup.product, Some(ProductRef::Id(product_id)));
        assert!(lookup.error.is_none());
        assert!(catalog.product(company_id, product_id).is_some());
    }

    #[test]
    fn record_registration_and_payload_are_returned() {
        let catalog = InMemoryCatalog::new();
        let company_id = CompanyId::new();
        let product = widget(company_id);
        let record = ProductRecordRef {
            id: Some(product.id_typed()),
            display_name: Some(product.display_name()),
        };
        catalog.insert_product(product).unwrap();
        catalog
            .register_barcode(
                company_id,
                "0109501101530003",
                ProductRef::Record(record.clone()),
                Some(StructuredPayload::with_quantity(12)),
            )
            .unwrap();

        let lookup = catalog.resolve_barcode("0109501101530003", company_id);
        assert_eq!(lookup.product, Some(ProductRef::Record(record)));
        assert_eq!(lookup.structured_payload.unwrap().encoded_quantity(), Some(12));
    }

    #[test]
    fn barcodes_are_company_isolated() {
        let catalog = InMemoryCatalog::new();
        let company_a = CompanyId::new();
        let company_b = CompanyId::new();
        catalog.add_product(widget(company_a), ["111"]).unwrap();

        assert!(catalog.resolve_barcode("111", company_a).product.is_some());
        assert_eq!(catalog.resolve_barcode("111", company_b), BarcodeLookup::default());
        assert!(catalog.list(company_b).is_empty());
        assert_eq!(catalog.list(company_a).len(), 1);
    }

    #[test]
    fn empty_barcode_reports_an_error() {
        let catalog = InMemoryCatalog::new();
        let company_id = CompanyId::new();

        let lookup = catalog.resolve_barcode("   ", company_id);
        assert!(lookup.product.is_none());
        assert_eq!(lookup.error.as_deref(), Some("Empty barcode"));
        assert_eq!(
            catalog.register_barcode(company_id, "", ProductId::new(AggregateId::new()), None),
            Err(CatalogError::EmptyBarcode)
        );
    }
}
