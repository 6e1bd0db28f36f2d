//! Payment method repository.
//!
//! Same ownership scoping as addresses. Only masked card data ever reaches
//! this layer; the full number is reduced to its last four digits upstream.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use furnspace_core::{PaymentMethodId, UserId};

use super::RepositoryError;
use crate::models::PaymentMethod;

/// Internal row type for `payment_methods` queries.
#[derive(Debug, sqlx::FromRow)]
struct PaymentMethodRow {
    id: i32,
    cardholder_name: String,
    card_last4: String,
    expiry_month: String,
    expiry_year: String,
    is_default: bool,
    created_at: DateTime<Utc>,
}

impl From<PaymentMethodRow> for PaymentMethod {
    fn from(row: PaymentMethodRow) -> Self {
        Self {
            id: PaymentMethodId::new(row.id),
            cardholder_name: row.cardholder_name,
            card_last4: row.card_last4,
            expiry_month: row.expiry_month,
            expiry_year: row.expiry_year,
            is_default: row.is_default,
            created_at: row.created_at,
        }
    }
}

const PAYMENT_METHOD_COLUMNS: &str =
    "id, cardholder_name, card_last4, expiry_month, expiry_year, is_default, created_at";

/// Repository for payment method database operations.
pub struct PaymentMethodRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PaymentMethodRepository<'a> {
    /// Create a new payment method repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a user's saved cards, default first, then newest.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<PaymentMethod>, RepositoryError> {
        let rows = sqlx::query_as::<_, PaymentMethodRow>(&format!(
            "SELECT {PAYMENT_METHOD_COLUMNS} FROM payment_methods
             WHERE user_id = $1
             ORDER BY is_default DESC, created_at DESC"
        ))
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Save a new card. The user's first card becomes the default.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        user_id: UserId,
        cardholder_name: &str,
        card_last4: &str,
        expiry_month: &str,
        expiry_year: &str,
    ) -> Result<PaymentMethod, RepositoryError> {
        let row = sqlx::query_as::<_, PaymentMethodRow>(&format!(
            "INSERT INTO payment_methods (user_id, cardholder_name, card_last4,
                                          expiry_month, expiry_year, is_default)
             VALUES ($1, $2, $3, $4, $5,
                     NOT EXISTS (SELECT 1 FROM payment_methods WHERE user_id = $1))
             RETURNING {PAYMENT_METHOD_COLUMNS}"
        ))
        .bind(user_id.as_i32())
        .bind(cardholder_name)
        .bind(card_last4)
        .bind(expiry_month)
        .bind(expiry_year)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Delete a saved card.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the card does not exist or
    /// belongs to another user.
    pub async fn delete(
        &self,
        user_id: UserId,
        id: PaymentMethodId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM payment_methods WHERE id = $2 AND user_id = $1")
            .bind(user_id.as_i32())
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Make a card the user's default, clearing the previous default.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the card does not exist or
    /// belongs to another user.
    pub async fn set_default(
        &self,
        user_id: UserId,
        id: PaymentMethodId,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE payment_methods SET is_default = FALSE WHERE user_id = $1")
            .bind(user_id.as_i32())
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query(
            "UPDATE payment_methods SET is_default = TRUE, updated_at = now()
             WHERE id = $2 AND user_id = $1",
        )
        .bind(user_id.as_i32())
        .bind(id.as_i32())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await?;
        Ok(())
    }
}
