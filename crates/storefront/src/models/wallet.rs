//! Wallet domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use furnspace_core::{WalletEntryId, WalletEntryKind, WalletId};

/// An entry in a wallet's append-only ledger.
#[derive(Debug, Clone, Serialize)]
pub struct WalletEntry {
    /// Entry ID.
    pub id: WalletEntryId,
    /// Amount moved (always positive; `kind` carries the direction).
    pub amount: Decimal,
    /// Whether the entry credits or debits the wallet.
    pub kind: WalletEntryKind,
    /// Human-readable description, e.g. "Refund for returned order ORD-12345".
    pub description: String,
    /// The order this entry settles, when applicable.
    pub order_code: Option<String>,
    /// When the entry was appended.
    pub created_at: DateTime<Utc>,
}

/// A user's refund wallet.
///
/// Users without a wallet row simply have no wallet yet; the first refund
/// creates one. Reads treat the missing row as a zero balance.
#[derive(Debug, Clone, Serialize)]
pub struct Wallet {
    /// Wallet ID.
    pub id: WalletId,
    /// Current balance.
    pub balance: Decimal,
    /// Ledger entries, newest first.
    pub entries: Vec<WalletEntry>,
}
