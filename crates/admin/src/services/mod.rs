//! Business logic services for the admin API.

pub mod auth;

pub use auth::{AdminAuthError, AdminAuthService, AdminClaims, AdminTokenService};
