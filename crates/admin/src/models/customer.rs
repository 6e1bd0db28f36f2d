//! Customer domain types.
//!
//! Customers are storefront users viewed from the back office.

use chrono::{DateTime, Utc};
use serde::Serialize;

use furnspace_core::{Email, UserId};

/// A storefront customer.
#[derive(Debug, Clone, Serialize)]
pub struct Customer {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone: Option<String>,
    /// Whether the signup OTP was confirmed.
    pub is_verified: bool,
    /// Whether the account may log in; toggled here.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
