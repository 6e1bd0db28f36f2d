//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check
//! GET  /health/ready               - Readiness check (DB + Redis)
//!
//! # Auth (rate limited)
//! POST /auth/register              - Start signup, email OTP
//! POST /auth/verify-otp            - Confirm OTP, issue tokens
//! POST /auth/login                 - Login, issue tokens
//! POST /auth/refresh               - Exchange refresh token for access token
//! POST /auth/logout                - Blacklist current tokens (requires auth)
//!
//! # Account (requires auth)
//! GET  /account                    - Current profile
//! PUT  /account                    - Update profile fields
//! PUT  /account/password           - Change password
//! GET  /account/addresses          - List addresses
//! POST /account/addresses          - Add address
//! PUT  /account/addresses/{id}     - Update address
//! DELETE /account/addresses/{id}   - Delete address
//! POST /account/addresses/{id}/default - Make address the default
//! GET  /account/payment-methods    - List saved cards (masked)
//! POST /account/payment-methods    - Save a card (masked on persist)
//! DELETE /account/payment-methods/{id} - Delete a card
//! POST /account/payment-methods/{id}/default - Make card the default
//!
//! # Catalog
//! GET  /products                   - Active products (requires auth)
//! GET  /products/{id}              - Product detail (public)
//!
//! # Cart (requires auth)
//! GET  /cart                       - Current cart
//! POST /cart/add                   - Add line (merges on product+color+size)
//! POST /cart/update                - Set line quantity
//! POST /cart/remove                - Remove line
//! POST /cart/clear                 - Empty the cart
//!
//! # Checkout & orders (requires auth)
//! POST /checkout                   - Place order from current cart
//! GET  /orders                     - Order history
//! GET  /orders/{id}                - Order detail
//! POST /orders/{id}/cancel         - Cancel (Pending/Processing only)
//! POST /orders/{id}/return         - Return (Delivered only; refunds wallet)
//!
//! # Wallet (requires auth)
//! GET  /wallet                     - Balance and ledger
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod orders;
pub mod products;
pub mod wallet;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::middleware;
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/verify-otp", post(auth::verify_otp))
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    use axum::routing::delete;

    Router::new()
        .route("/", get(account::profile).put(account::update_profile))
        .route("/password", put(account::change_password))
        .route(
            "/addresses",
            get(account::addresses).post(account::create_address),
        )
        .route(
            "/addresses/{id}",
            put(account::update_address).delete(account::delete_address),
        )
        .route("/addresses/{id}/default", post(account::set_default_address))
        .route(
            "/payment-methods",
            get(account::payment_methods).post(account::create_payment_method),
        )
        .route("/payment-methods/{id}", delete(account::delete_payment_method))
        .route(
            "/payment-methods/{id}/default",
            post(account::set_default_payment_method),
        )
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
        .route("/{id}/cancel", post(orders::cancel))
        .route("/{id}/return", post(orders::return_order))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Auth routes, behind the strict rate limiter
        .nest("/auth", auth_routes().layer(middleware::auth_rate_limiter()))
        // Account routes
        .nest("/account", account_routes())
        // Catalog routes
        .nest("/products", product_routes())
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout
        .route("/checkout", post(checkout::place_order))
        // Order routes
        .nest("/orders", order_routes())
        // Wallet
        .route("/wallet", get(wallet::show))
}
