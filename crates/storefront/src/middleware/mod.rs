//! Request middleware and extractors.

pub mod auth;
pub mod rate_limit;

pub use auth::CurrentUser;
pub use rate_limit::auth_rate_limiter;
