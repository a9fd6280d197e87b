use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use orderscan_core::CompanyScoped;
use orderscan_infra::{OrderStore, ScanError};
use orderscan_sales::{
    AddDisplayLine, OrderTransition, RejectReason, SalesOrder, SalesOrderCommand, SalesOrderId,
    ScanRejection, ScanResult,
};

use crate::app::{dto, errors};
use crate::app::services::{AppServices, Resolver};
use crate::context::CompanyContext;

pub fn router() -> Router {
    Router::new()
        .nest("/orders", orders_router())
        .route("/order-lines/from-barcode", post(create_line_from_barcode))
}

fn orders_router() -> Router {
    Router::new()
        .route("/", post(create_sales_order))
        .route("/:id", get(get_sales_order))
        .route("/:id/confirm", post(confirm_sales_order))
        .route("/:id/lock", post(lock_sales_order))
        .route("/:id/unlock", post(unlock_sales_order))
        .route("/:id/done", post(mark_sales_order_done))
        .route("/:id/cancel", post(cancel_sales_order))
        .route("/:id/sections", post(add_display_line))
        .route("/:id/scan", post(scan_barcode))
        .route("/:id/scan-action", get(scan_action))
        .route("/:id/history", get(get_sales_order_history))
}

/// Load an order visible to `company`. Orders of other companies are reported
/// as missing.
fn load_scoped(
    services: &AppServices,
    company: CompanyContext,
    order_id: SalesOrderId,
) -> Result<Option<SalesOrder>, axum::response::Response> {
    let order = services
        .orders
        .load(order_id)
        .map_err(errors::store_error_to_response)?;
    Ok(order.filter(|o| o.belongs_to(company.company_id())))
}

fn order_not_found() -> axum::response::Response {
    errors::json_error(StatusCode::NOT_FOUND, "not_found", "sales order not found")
}

pub async fn create_sales_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(company): Extension<CompanyContext>,
) -> axum::response::Response {
    let order_id = match services.orders.create_order(company.company_id()) {
        Ok(id) => id,
        Err(e) => return errors::store_error_to_response(e),
    };

    match services.orders.load(order_id) {
        Ok(Some(order)) => (StatusCode::CREATED, Json(dto::sales_order_to_json(&order))).into_response(),
        Ok(None) => order_not_found(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_sales_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(company): Extension<CompanyContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let order_id = match dto::parse_order_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match load_scoped(&services, company, order_id) {
        Ok(Some(order)) => (StatusCode::OK, Json(dto::sales_order_to_json(&order))).into_response(),
        Ok(None) => order_not_found(),
        Err(resp) => resp,
    }
}

pub async fn get_sales_order_history(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(company): Extension<CompanyContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let order_id = match dto::parse_order_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match load_scoped(&services, company, order_id) {
        Ok(Some(_)) => {}
        Ok(None) => return order_not_found(),
        Err(resp) => return resp,
    }
    match services.orders.history(order_id) {
        Ok(items) => (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

fn run_command(
    services: &AppServices,
    company: CompanyContext,
    id: &str,
    build: impl FnOnce(SalesOrderId, chrono::DateTime<Utc>) -> SalesOrderCommand,
) -> axum::response::Response {
    let order_id = match dto::parse_order_id(id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match load_scoped(services, company, order_id) {
        Ok(Some(_)) => {}
        Ok(None) => return order_not_found(),
        Err(resp) => return resp,
    }

    if let Err(e) = services
        .orders
        .execute(order_id, |_company_id| build(order_id, Utc::now()))
    {
        return errors::store_error_to_response(e);
    }

    match services.orders.load(order_id) {
        Ok(Some(order)) => (StatusCode::OK, Json(dto::sales_order_to_json(&order))).into_response(),
        Ok(None) => order_not_found(),
        Err(e) => errors::store_error_to_response(e),
    }
}

fn transition(
    services: &AppServices,
    company: CompanyContext,
    id: &str,
    command: fn(OrderTransition) -> SalesOrderCommand,
) -> axum::response::Response {
    run_command(services, company, id, |order_id, occurred_at| {
        command(OrderTransition {
            company_id: company.company_id(),
            order_id,
            occurred_at,
        })
    })
}

pub async fn confirm_sales_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(company): Extension<CompanyContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    transition(&services, company, &id, SalesOrderCommand::ConfirmOrder)
}

pub async fn lock_sales_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(company): Extension<CompanyContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    transition(&services, company, &id, SalesOrderCommand::LockOrder)
}

pub async fn unlock_sales_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(company): Extension<CompanyContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    transition(&services, company, &id, SalesOrderCommand::UnlockOrder)
}

pub async fn mark_sales_order_done(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(company): Extension<CompanyContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    transition(&services, company, &id, SalesOrderCommand::MarkDone)
}

pub async fn cancel_sales_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(company): Extension<CompanyContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    transition(&services, company, &id, SalesOrderCommand::CancelOrder)
}

pub async fn add_display_line(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(company): Extension<CompanyContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::AddDisplayLineRequest>,
) -> axum::response::Response {
    run_command(&services, company, &id, |order_id, occurred_at| {
        SalesOrderCommand::AddDisplayLine(AddDisplayLine {
            company_id: company.company_id(),
            order_id,
            display_type: body.display_type,
            description: body.description,
            occurred_at,
        })
    })
}

/// Scan into an order visible to `company`. Unknown orders answer 404 with
/// an `ORDER_NOT_FOUND` warning body.
fn run_scan(
    services: &AppServices,
    company: CompanyContext,
    order_id: SalesOrderId,
    scan: impl FnOnce(&Resolver) -> Result<ScanResult, ScanError>,
) -> axum::response::Response {
    match load_scoped(services, company, order_id) {
        Ok(Some(_)) => {}
        Ok(None) => {
            let result = ScanResult::Rejected(ScanRejection::order_not_found());
            return (StatusCode::NOT_FOUND, Json(result)).into_response();
        }
        Err(resp) => return resp,
    }

    match scan(&services.resolver) {
        Ok(result) => {
            let status = if result.reason() == Some(RejectReason::OrderNotFound) {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::OK
            };
            (status, Json(result)).into_response()
        }
        Err(e) => errors::scan_error_to_response(e),
    }
}

pub async fn scan_barcode(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(company): Extension<CompanyContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::ScanRequest>,
) -> axum::response::Response {
    let order_id = match dto::parse_order_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    run_scan(&services, company, order_id, |resolver| {
        resolver.scan(order_id, &body.barcode)
    })
}

pub async fn create_line_from_barcode(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(company): Extension<CompanyContext>,
    Json(body): Json<dto::LineFromBarcodeRequest>,
) -> axum::response::Response {
    let order_id = match dto::parse_order_id(&body.order_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    run_scan(&services, company, order_id, |resolver| {
        resolver.create_line_from_scan(order_id, &body.barcode)
    })
}

pub async fn scan_action(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(company): Extension<CompanyContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let order_id = match dto::parse_order_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match load_scoped(&services, company, order_id) {
        Ok(Some(order)) => {
            let can_scan = orderscan_sales::scan::can_scan(&order);
            (StatusCode::OK, Json(dto::scan_action_to_json(order_id, can_scan))).into_response()
        }
        Ok(None) => order_not_found(),
        Err(resp) => resp,
    }
}
