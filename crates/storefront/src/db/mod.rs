//! Database operations for the storefront `PostgreSQL` database.
//!
//! # Tables
//!
//! - `users` / `email_verification_codes` - accounts and signup OTPs
//! - `products` - catalog (written by the admin service, read here)
//! - `carts` / `cart_items` - per-user carts
//! - `addresses` / `payment_methods` - saved checkout details
//! - `orders` / `order_items` - placed orders with snapshot line items
//! - `wallets` / `wallet_entries` - refund wallets and their ledgers
//!
//! Repositories hold a pool reference, keep their `sqlx::FromRow` row types
//! private, and convert rows into domain types via `TryFrom` so invalid
//! stored data surfaces as `RepositoryError::DataCorruption` instead of
//! leaking outward.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p furnspace-cli -- migrate storefront
//! ```

pub mod addresses;
pub mod carts;
pub mod orders;
pub mod payment_methods;
pub mod products;
pub mod users;
pub mod wallets;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use addresses::{AddressFields, AddressRepository};
pub use carts::CartRepository;
pub use orders::{NewOrder, NewOrderItem, OrderRepository};
pub use payment_methods::PaymentMethodRepository;
pub use products::ProductRepository;
pub use users::UserRepository;
pub use wallets::WalletRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email or order code).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
