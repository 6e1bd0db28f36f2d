//! Status enums for orders, payments, and wallet ledger entries.
//!
//! Lifecycle rules live here rather than in the services so that both the
//! storefront and admin crates enforce the same transitions.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing a status string from the database or a request.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown status value: {0}")]
pub struct StatusParseError(pub String);

/// Order fulfillment lifecycle.
///
/// The happy path runs Pending -> Processing -> Shipped -> Delivered.
/// Cancelled and Returned are terminal. Customers may cancel before
/// shipment and return after delivery; every other transition is driven
/// by admin status updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Returned,
}

impl OrderStatus {
    /// Whether the customer may still cancel an order in this state.
    ///
    /// Only orders that have not left the warehouse qualify.
    #[must_use]
    pub const fn can_cancel(self) -> bool {
        matches!(self, Self::Pending | Self::Processing)
    }

    /// Whether the customer may return an order in this state.
    ///
    /// Only delivered orders qualify; in particular an already-returned
    /// order cannot be returned again, which keeps the refund-to-wallet
    /// path from crediting twice.
    #[must_use]
    pub const fn can_return(self) -> bool {
        matches!(self, Self::Delivered)
    }

    /// Whether this state admits no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Returned)
    }

    /// The statuses an admin may set directly.
    ///
    /// Returned is excluded: it is reachable only through the storefront
    /// return flow, which also settles the refund.
    pub const ADMIN_SETTABLE: [Self; 5] = [
        Self::Pending,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Stable string form, used for database storage and JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Returned => "returned",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            "returned" => Ok(Self::Returned),
            other => Err(StatusParseError(other.to_owned())),
        }
    }
}

/// Payment settlement state of an order.
///
/// Refunded is set exactly once, when a return credits the wallet; the
/// Paid -> Refunded edge is what makes the refund idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Paid,
    Refunded,
}

impl PaymentStatus {
    /// Stable string form, used for database storage and JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Paid => "paid",
            Self::Refunded => "refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unpaid" => Ok(Self::Unpaid),
            "paid" => Ok(Self::Paid),
            "refunded" => Ok(Self::Refunded),
            other => Err(StatusParseError(other.to_owned())),
        }
    }
}

/// Direction of a wallet ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletEntryKind {
    Credit,
    Debit,
}

impl WalletEntryKind {
    /// Stable string form, used for database storage and JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
        }
    }
}

impl fmt::Display for WalletEntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WalletEntryKind {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credit" => Ok(Self::Credit),
            "debit" => Ok(Self::Debit),
            other => Err(StatusParseError(other.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_guard() {
        assert!(OrderStatus::Pending.can_cancel());
        assert!(OrderStatus::Processing.can_cancel());
        assert!(!OrderStatus::Shipped.can_cancel());
        assert!(!OrderStatus::Delivered.can_cancel());
        assert!(!OrderStatus::Cancelled.can_cancel());
        assert!(!OrderStatus::Returned.can_cancel());
    }

    #[test]
    fn test_return_guard() {
        assert!(OrderStatus::Delivered.can_return());
        assert!(!OrderStatus::Pending.can_return());
        assert!(!OrderStatus::Shipped.can_return());
        // A second return attempt must be rejected.
        assert!(!OrderStatus::Returned.can_return());
        assert!(!OrderStatus::Cancelled.can_return());
    }

    #[test]
    fn test_terminal_states() {
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(OrderStatus::Returned.is_terminal());
        assert!(!OrderStatus::Delivered.is_terminal());
    }

    #[test]
    fn test_order_status_string_roundtrip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
            OrderStatus::Returned,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
        assert!("Shipped".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_admin_settable_excludes_returned() {
        assert!(!OrderStatus::ADMIN_SETTABLE.contains(&OrderStatus::Returned));
        assert_eq!(OrderStatus::ADMIN_SETTABLE.len(), 5);
    }

    #[test]
    fn test_payment_status_roundtrip() {
        for status in [
            PaymentStatus::Unpaid,
            PaymentStatus::Paid,
            PaymentStatus::Refunded,
        ] {
            assert_eq!(status.as_str().parse::<PaymentStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_wallet_entry_kind_roundtrip() {
        assert_eq!("credit".parse::<WalletEntryKind>().unwrap(), WalletEntryKind::Credit);
        assert_eq!("debit".parse::<WalletEntryKind>().unwrap(), WalletEntryKind::Debit);
        assert!("transfer".parse::<WalletEntryKind>().is_err());
    }
}
