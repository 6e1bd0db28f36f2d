//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use furnspace_core::{Email, UserId};

/// A storefront user.
///
/// `password_hash` never leaves the repository layer; this type is safe to
/// serialize into API responses.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// User's email address.
    pub email: Email,
    /// Optional contact phone number.
    pub phone: Option<String>,
    /// Whether the signup OTP has been confirmed.
    pub is_verified: bool,
    /// Whether the account is allowed to log in (admin-controlled).
    pub is_active: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}
