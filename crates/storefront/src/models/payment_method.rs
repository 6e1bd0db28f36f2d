//! Payment method domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use furnspace_core::PaymentMethodId;

/// A saved card, stored masked.
///
/// Only the cardholder name, expiry, and last four digits are kept; the
/// full number and CVV are discarded when the method is saved.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentMethod {
    /// Payment method ID.
    pub id: PaymentMethodId,
    /// Name on the card.
    pub cardholder_name: String,
    /// Last four digits of the card number.
    pub card_last4: String,
    /// Two-digit expiry month.
    pub expiry_month: String,
    /// Four-digit expiry year.
    pub expiry_year: String,
    /// Whether this is the user's default card. At most one per user.
    pub is_default: bool,
    /// When the card was saved.
    pub created_at: DateTime<Utc>,
}
