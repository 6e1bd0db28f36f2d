//! Address domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use furnspace_core::AddressId;

/// A saved shipping address.
#[derive(Debug, Clone, Serialize)]
pub struct Address {
    /// Address ID.
    pub id: AddressId,
    /// Street address.
    pub address: String,
    /// Apartment / unit, if any.
    pub apartment: Option<String>,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: String,
    /// Whether this is the user's default shipping address. At most one
    /// address per user carries the flag.
    pub is_default: bool,
    /// When the address was saved.
    pub created_at: DateTime<Utc>,
}
