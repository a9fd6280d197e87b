use axum::Router;

pub mod products;
pub mod sales;
pub mod system;

/// Router for all company-scoped endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/products", products::router())
        .nest("/sales", sales::router())
}
