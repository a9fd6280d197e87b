use serde::Deserialize;

use orderscan_products::{PricingMetadata, Product, ProductType, StructuredPayload};
use orderscan_sales::{DisplayType, SalesOrder, SalesOrderId};

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub sku: Option<String>,
    #[serde(default = "default_product_type")]
    pub product_type: ProductType,
    #[serde(default)]
    pub qty_available: i64,
    pub uom: Option<String>,
    pub pricing: Option<PricingMetadata>,
    #[serde(default)]
    pub barcodes: Vec<String>,
}

fn default_product_type() -> ProductType {
    ProductType::Storable
}

/// Extra barcode for an existing product, optionally carrying encoded data.
#[derive(Debug, Deserialize)]
pub struct RegisterBarcodeRequest {
    pub barcode: String,
    pub structured_payload: Option<StructuredPayload>,
}

#[derive(Debug, Deserialize)]
pub struct AddDisplayLineRequest {
    pub description: String,
    #[serde(default = "default_display_type")]
    pub display_type: DisplayType,
}

fn default_display_type() -> DisplayType {
    DisplayType::Section
}

#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub barcode: String,
}

#[derive(Debug, Deserialize)]
pub struct LineFromBarcodeRequest {
    pub order_id: String,
    pub barcode: String,
}

// -------------------------
// Response mapping helpers
// -------------------------

pub fn product_to_json(product: &Product) -> serde_json::Value {
    serde_json::json!({
        "id": product.id_typed().to_string(),
        "sku": product.sku(),
        "name": product.name(),
        "display_name": product.display_name(),
        "product_type": product.product_type(),
        "qty_available": product.qty_available(),
        "uom": product.uom(),
        "pricing": product.pricing(),
    })
}

pub fn sales_order_to_json(order: &SalesOrder) -> serde_json::Value {
    serde_json::json!({
        "id": order.id_typed().to_string(),
        "status": order.status(),
        "locked": order.is_locked(),
        "can_scan": orderscan_sales::scan::can_scan(order),
        "lines": order.lines(),
    })
}

/// Window action the UI opens to start scanning into an order.
pub fn scan_action_to_json(order_id: SalesOrderId, can_scan: bool) -> serde_json::Value {
    serde_json::json!({
        "model": "sale.order",
        "res_id": order_id.to_string(),
        "can_scan": can_scan,
    })
}

pub fn parse_order_id(raw: &str) -> Result<SalesOrderId, axum::response::Response> {
    raw.parse().map_err(|_| {
        errors::json_error(
            axum::http::StatusCode::BAD_REQUEST,
            "invalid_id",
            "invalid order id",
        )
    })
}
