use serde::{Deserialize, Serialize};

use orderscan_core::{AggregateId, CompanyId, CompanyScoped, DomainError, DomainResult, Entity};

/// Product identifier (company-scoped via the owning `Product`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub AggregateId);

impl ProductId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl core::str::FromStr for ProductId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// How the product is tracked by the warehouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    /// Stock-tracked: on-hand quantity is meaningful.
    Storable,
    Consumable,
    Service,
}

/// Optional pricing metadata used to default new order lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingMetadata {
    pub base_price: Option<u64>, // Price in smallest currency unit (e.g., cents)
    pub currency: Option<String>, // ISO currency code (e.g., "USD", "EUR")
}

/// Catalog product as seen by the sales side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    company_id: CompanyId,
    sku: Option<String>,
    name: String,
    product_type: ProductType,
    qty_available: i64,
    uom: String,
    pricing: PricingMetadata,
}

impl Product {
    /// Build a product with default unit of measure ("Units") and no stock.
    pub fn new(
        id: ProductId,
        company_id: CompanyId,
        name: impl Into<String>,
        product_type: ProductType,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        Ok(Self {
            id,
            company_id,
            sku: None,
            name,
            product_type,
            qty_available: 0,
            uom: "Units".to_string(),
            pricing: PricingMetadata::default(),
        })
    }

    pub fn with_sku(mut self, sku: impl Into<String>) -> DomainResult<Self> {
        let sku = sku.into();
        if sku.trim().is_empty() {
            return Err(DomainError::validation("SKU cannot be empty"));
        }
        self.sku = Some(sku);
        Ok(self)
    }

    pub fn with_uom(mut self, uom: impl Into<String>) -> DomainResult<Self> {
        let uom = uom.into();
        if uom.trim().is_empty() {
            return Err(DomainError::validation("unit of measure cannot be empty"));
        }
        self.uom = uom;
        Ok(self)
    }

    pub fn with_qty_available(mut self, qty_available: i64) -> Self {
        self.qty_available = qty_available;
        self
    }

    pub fn with_pricing(mut self, pricing: PricingMetadata) -> Self {
        self.pricing = pricing;
        self
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn company_id(&self) -> CompanyId {
        self.company_id
    }

    pub fn sku(&self) -> Option<&str> {
        self.sku.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name shown to users: `[SKU] Name` when a SKU is set.
    pub fn display_name(&self) -> String {
        match &self.sku {
            Some(sku) => format!("[{sku}] {}", self.name),
            None => self.name.clone(),
        }
    }

    pub fn product_type(&self) -> ProductType {
        self.product_type
    }

    pub fn is_stock_tracked(&self) -> bool {
        self.product_type == ProductType::Storable
    }

    pub fn qty_available(&self) -> i64 {
        self.qty_available
    }

    pub fn uom(&self) -> &str {
        &self.uom
    }

    pub fn pricing(&self) -> &PricingMetadata {
        &self.pricing
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl CompanyScoped for Product {
    fn owning_company(&self) -> Option<CompanyId> {
        Some(self.company_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_product_id() -> ProductId {
        ProductId::new(AggregateId::new())
    }

    #[test]
    fn new_product_defaults_to_units_without_stock() {
        let product =
            Product::new(test_product_id(), CompanyId::new(), "Widget", ProductType::Storable).unwrap();
        assert_eq!(product.uom(), "Units");
        assert_eq!(product.qty_available(), 0);
        assert_eq!(product.display_name(), "Widget");
        assert!(product.is_stock_tracked());
    }

    #[test]
    fn new_product_rejects_empty_name() {
        let err = Product::new(test_product_id(), CompanyId::new(), "   ", ProductType::Consumable)
            .unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for empty name"),
        }
    }

    #[test]
    fn display_name_prefixes_sku() {
        let product = Product::new(test_product_id(), CompanyId::new(), "Widget", ProductType::Service)
            .unwrap()
            .with_sku("WDG-1")
            .unwrap();
        assert_eq!(product.display_name(), "[WDG-1] Widget");
        assert!(!product.is_stock_tracked());
    }

    #[test]
    fn with_uom_rejects_blank_label() {
        let err = Product::new(test_product_id(), CompanyId::new(), "Widget", ProductType::Storable)
            .unwrap()
            .with_uom("")
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn product_belongs_to_its_company_only() {
        let company_id = CompanyId::new();
        let product = Product::new(test_product_id(), company_id, "Widget", ProductType::Storable).unwrap();
        assert!(product.belongs_to(company_id));
        assert!(!product.belongs_to(CompanyId::new()));
    }

    #[test]
    fn product_id_parses_from_display() {
        let id = test_product_id();
        let parsed: ProductId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }
}
