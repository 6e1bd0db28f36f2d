//! HTTP route handlers for the admin API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check
//! GET  /health/ready               - Readiness check (DB)
//!
//! # Auth
//! POST /auth/login                 - Admin login, issues admin JWT
//!
//! # Catalog (requires admin token; writes require a writing role)
//! GET  /products                   - All products, including inactive
//! POST /products                   - Create product
//! GET  /products/{id}              - Product detail
//! PUT  /products/{id}              - Partial update
//! DELETE /products/{id}            - Soft delete (deactivate)
//!
//! # Customers
//! GET  /customers                  - All storefront users
//! POST /customers/{id}/activate    - Allow login
//! POST /customers/{id}/deactivate  - Block login
//! DELETE /customers/{id}           - Delete (refused while orders exist)
//!
//! # Orders
//! GET  /orders                     - All orders, newest first
//! GET  /orders/{id}                - Order detail
//! PUT  /orders/{id}/status         - Set fulfillment status
//! ```

pub mod auth;
pub mod customers;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(auth::login))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::remove),
        )
}

/// Create the customer routes router.
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(customers::index))
        .route("/{id}/activate", post(customers::activate))
        .route("/{id}/deactivate", post(customers::deactivate))
        .route("/{id}", delete(customers::remove))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
        .route("/{id}/status", put(orders::update_status))
}

/// Create all routes for the admin API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/products", product_routes())
        .nest("/customers", customer_routes())
        .nest("/orders", order_routes())
}
