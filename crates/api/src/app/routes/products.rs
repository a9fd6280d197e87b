use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use orderscan_core::{AggregateId, DomainError};
use orderscan_products::{CatalogLookup, Product, ProductId};

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::CompanyContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_product).get(list_products))
        .route("/:id", get(get_product))
        .route("/:id/barcodes", post(register_barcode))
}

fn build_product(
    company: CompanyContext,
    body: dto::CreateProductRequest,
) -> Result<Product, DomainError> {
    let mut product = Product::new(
        ProductId::new(AggregateId::new()),
        company.company_id(),
        body.name,
        body.product_type,
    )?
    .with_qty_available(body.qty_available);

    if let Some(sku) = body.sku {
        product = product.with_sku(sku)?;
    }
    if let Some(uom) = body.uom {
        product = product.with_uom(uom)?;
    }
    if let Some(pricing) = body.pricing {
        product = product.with_pricing(pricing);
    }
    Ok(product)
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(company): Extension<CompanyContext>,
    Json(body): Json<dto::CreateProductRequest>,
) -> axum::response::Response {
    let barcodes = body.barcodes.clone();
    let product = match build_product(company, body) {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let json = dto::product_to_json(&product);
    if let Err(e) = services.catalog.add_product(product, &barcodes) {
        return errors::json_error(StatusCode::BAD_REQUEST, "catalog_error", e.to_string());
    }

    (StatusCode::CREATED, Json(json)).into_response()
}

pub async fn register_barcode(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(company): Extension<CompanyContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::RegisterBarcodeRequest>,
) -> axum::response::Response {
    let product_id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id"),
    };
    if services.catalog.product(company.company_id(), product_id).is_none() {
        return errors::json_error(StatusCode::NOT_FOUND, "not_found", "product not found");
    }

    match services.catalog.register_barcode(
        company.company_id(),
        &body.barcode,
        product_id,
        body.structured_payload,
    ) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::json_error(StatusCode::BAD_REQUEST, "catalog_error", e.to_string()),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(company): Extension<CompanyContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let product_id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id"),
    };
    match services.catalog.product(company.company_id(), product_id) {
        Some(p) => (StatusCode::OK, Json(dto::product_to_json(&p))).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "product not found"),
    }
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(company): Extension<CompanyContext>,
) -> axum::response::Response {
    let items = services
        .catalog
        .list(company.company_id())
        .iter()
        .map(dto::product_to_json)
        .collect::<Vec<_>>();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}
