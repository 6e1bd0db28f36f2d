//! Business logic services.
//!
//! Services own the flows; repositories own the SQL. Handlers construct the
//! service they need from [`crate::state::AppState`] per request.

pub mod auth;
pub mod blacklist;
pub mod catalog;
pub mod checkout;
pub mod email;
pub mod tokens;

pub use auth::{AuthService, TokenPair};
pub use blacklist::TokenBlacklist;
pub use catalog::{CatalogCache, CatalogService};
pub use checkout::CheckoutService;
pub use email::EmailService;
pub use tokens::{Claims, TokenService, TokenUse};
