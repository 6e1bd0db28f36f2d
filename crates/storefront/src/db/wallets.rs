//! Wallet repository.
//!
//! The balance column is denormalized from the ledger; `credit` updates
//! both inside one transaction so they cannot drift.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use furnspace_core::{UserId, WalletEntryId, WalletEntryKind, WalletId};

use super::RepositoryError;
use crate::models::{Wallet, WalletEntry};

/// Internal row type for `wallet_entries` queries.
#[derive(Debug, sqlx::FromRow)]
struct WalletEntryRow {
    id: i32,
    amount: Decimal,
    kind: String,
    description: String,
    order_code: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<WalletEntryRow> for WalletEntry {
    type Error = RepositoryError;

    fn try_from(row: WalletEntryRow) -> Result<Self, Self::Error> {
        let kind = row.kind.parse::<WalletEntryKind>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid wallet entry kind in database: {e}"))
        })?;

        Ok(Self {
            id: WalletEntryId::new(row.id),
            amount: row.amount,
            kind,
            description: row.description,
            order_code: row.order_code,
            created_at: row.created_at,
        })
    }
}

/// Repository for wallet database operations.
pub struct WalletRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> WalletRepository<'a> {
    /// Create a new wallet repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch a user's wallet with its ledger, newest entries first.
    ///
    /// Returns `None` when the user has never been credited; callers render
    /// that as a zero balance with an empty ledger.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_for_user(&self, user_id: UserId) -> Result<Option<Wallet>, RepositoryError> {
        let wallet: Option<(i32, Decimal)> =
            sqlx::query_as("SELECT id, balance FROM wallets WHERE user_id = $1")
                .bind(user_id.as_i32())
                .fetch_optional(self.pool)
                .await?;

        let Some((wallet_id, balance)) = wallet else {
            return Ok(None);
        };

        let rows = sqlx::query_as::<_, WalletEntryRow>(
            "SELECT id, amount, kind, description, order_code, created_at
             FROM wallet_entries
             WHERE wallet_id = $1
             ORDER BY created_at DESC, id DESC",
        )
        .bind(wallet_id)
        .fetch_all(self.pool)
        .await?;

        let entries = rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(Wallet {
            id: WalletId::new(wallet_id),
            balance,
            entries,
        }))
    }

    /// Credit a user's wallet, creating the wallet if it does not exist yet,
    /// and append the matching ledger entry - all in one transaction.
    ///
    /// Returns the new balance and the appended entry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails.
    pub async fn credit(
        &self,
        user_id: UserId,
        amount: Decimal,
        description: &str,
        order_code: Option<&str>,
    ) -> Result<(Decimal, WalletEntry), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO wallets (user_id) VALUES ($1)
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id.as_i32())
        .execute(&mut *tx)
        .await?;

        let (wallet_id, balance): (i32, Decimal) = sqlx::query_as(
            "UPDATE wallets SET balance = balance + $2, updated_at = now()
             WHERE user_id = $1
             RETURNING id, balance",
        )
        .bind(user_id.as_i32())
        .bind(amount)
        .fetch_one(&mut *tx)
        .await?;

        let entry_row = sqlx::query_as::<_, WalletEntryRow>(
            "INSERT INTO wallet_entries (wallet_id, amount, kind, description, order_code)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, amount, kind, description, order_code, created_at",
        )
        .bind(wallet_id)
        .bind(amount)
        .bind(WalletEntryKind::Credit.as_str())
        .bind(description)
        .bind(order_code)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((balance, entry_row.try_into()?))
    }
}
