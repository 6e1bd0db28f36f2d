//! Address repository.
//!
//! Every query is scoped by user ID - an address ID belonging to another
//! user behaves exactly like a missing one.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use furnspace_core::{AddressId, UserId};

use super::RepositoryError;
use crate::models::Address;

/// Internal row type for `addresses` queries.
#[derive(Debug, sqlx::FromRow)]
struct AddressRow {
    id: i32,
    address: String,
    apartment: Option<String>,
    city: String,
    state: String,
    country: String,
    zip_code: String,
    is_default: bool,
    created_at: DateTime<Utc>,
}

impl From<AddressRow> for Address {
    fn from(row: AddressRow) -> Self {
        Self {
            id: AddressId::new(row.id),
            address: row.address,
            apartment: row.apartment,
            city: row.city,
            state: row.state,
            country: row.country,
            zip_code: row.zip_code,
            is_default: row.is_default,
            created_at: row.created_at,
        }
    }
}

const ADDRESS_COLUMNS: &str =
    "id, address, apartment, city, state, country, zip_code, is_default, created_at";

/// Fields for creating or replacing an address.
#[derive(Debug, Clone)]
pub struct AddressFields {
    pub address: String,
    pub apartment: Option<String>,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: String,
}

/// Repository for address database operations.
pub struct AddressRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AddressRepository<'a> {
    /// Create a new address repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a user's addresses, default first, then newest.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Address>, RepositoryError> {
        let rows = sqlx::query_as::<_, AddressRow>(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM addresses
             WHERE user_id = $1
             ORDER BY is_default DESC, created_at DESC"
        ))
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Save a new address. The user's first address becomes the default.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        user_id: UserId,
        fields: &AddressFields,
    ) -> Result<Address, RepositoryError> {
        let row = sqlx::query_as::<_, AddressRow>(&format!(
            "INSERT INTO addresses (user_id, address, apartment, city, state, country, zip_code,
                                    is_default)
             VALUES ($1, $2, $3, $4, $5, $6, $7,
                     NOT EXISTS (SELECT 1 FROM addresses WHERE user_id = $1))
             RETURNING {ADDRESS_COLUMNS}"
        ))
        .bind(user_id.as_i32())
        .bind(&fields.address)
        .bind(fields.apartment.as_deref())
        .bind(&fields.city)
        .bind(&fields.state)
        .bind(&fields.country)
        .bind(&fields.zip_code)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Replace an address's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address does not exist or
    /// belongs to another user.
    pub async fn update(
        &self,
        user_id: UserId,
        id: AddressId,
        fields: &AddressFields,
    ) -> Result<Address, RepositoryError> {
        let row = sqlx::query_as::<_, AddressRow>(&format!(
            "UPDATE addresses
             SET address = $3, apartment = $4, city = $5, state = $6, country = $7,
                 zip_code = $8, updated_at = now()
             WHERE id = $2 AND user_id = $1
             RETURNING {ADDRESS_COLUMNS}"
        ))
        .bind(user_id.as_i32())
        .bind(id.as_i32())
        .bind(&fields.address)
        .bind(fields.apartment.as_deref())
        .bind(&fields.city)
        .bind(&fields.state)
        .bind(&fields.country)
        .bind(&fields.zip_code)
        .fetch_optional(self.pool)
        .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Delete an address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address does not exist or
    /// belongs to another user.
    pub async fn delete(&self, user_id: UserId, id: AddressId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM addresses WHERE id = $2 AND user_id = $1")
            .bind(user_id.as_i32())
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Make an address the user's default, clearing the previous default.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address does not exist or
    /// belongs to another user.
    pub async fn set_default(&self, user_id: UserId, id: AddressId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE addresses SET is_default = FALSE WHERE user_id = $1")
            .bind(user_id.as_i32())
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query(
            "UPDATE addresses SET is_default = TRUE, updated_at = now()
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
