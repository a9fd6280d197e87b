use axum::{
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use orderscan_core::CompanyId;

use crate::context::CompanyContext;

/// Header carrying the company every domain request is scoped to.
pub const COMPANY_HEADER: &str = "x-company-id";

pub async fn company_middleware(
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let company_id = extract_company(req.headers())?;

    req.extensions_mut().insert(CompanyContext::new(company_id));

    Ok(next.run(req).await)
}

fn extract_company(headers: &HeaderMap) -> Result<CompanyId, StatusCode> {
    let header = headers
        .get(COMPANY_HEADER)
        .ok_or(StatusCode::BAD_REQUEST)?;

    let header = header.to_str().map_err(|_| StatusCode::BAD_REQUEST)?;

    header.trim().parse().map_err(|_| StatusCode::BAD_REQUEST)
}
