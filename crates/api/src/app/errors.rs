use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use orderscan_core::DomainError;
use orderscan_infra::{OrderStoreError, ScanError};

pub fn store_error_to_response(err: OrderStoreError) -> axum::response::Response {
    match err {
        OrderStoreError::OrderNotFound(_) => {
            json_error(StatusCode::NOT_FOUND, "not_found", "sales order not found")
        }
        OrderStoreError::LineNotFound { .. } => {
            json_error(StatusCode::NOT_FOUND, "not_found", err.to_string())
        }
        OrderStoreError::UnknownProduct(_) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "unknown_product", err.to_string())
        }
        OrderStoreError::Concurrency(_) => {
            json_error(StatusCode::CONFLICT, "conflict", err.to_string())
        }
        OrderStoreError::Domain(e) => domain_error_to_response(e),
        OrderStoreError::LockPoisoned => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "store_error",
            err.to_string(),
        ),
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    let status = match err {
        DomainError::Validation(_) | DomainError::InvalidId(_) => StatusCode::BAD_REQUEST,
        DomainError::InvariantViolation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::NotFound => StatusCode::NOT_FOUND,
    };
    json_error(status, err.code(), err.to_string())
}

pub fn scan_error_to_response(err: ScanError) -> axum::response::Response {
    match err {
        ScanError::Domain(e) => {
            tracing::warn!(error = %e, "scan could not be applied");
            domain_error_to_response(e)
        }
        ScanError::Store(e @ OrderStoreError::Concurrency(_)) => {
            tracing::warn!(error = %e, "scan gave up after repeated conflicts");
            store_error_to_response(e)
        }
        ScanError::Store(e) => {
            tracing::error!(error = %e, "scan failed");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "store_error",
                e.to_string(),
            )
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
