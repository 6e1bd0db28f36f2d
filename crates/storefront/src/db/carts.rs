//! Cart repository.
//!
//! A cart is created lazily on the first add. The merge rule - same
//! product, color, and size folds into one line - is enforced by the
//! `cart_items_line_key` unique index and an upsert, so concurrent adds of
//! the same line cannot produce duplicates.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use furnspace_core::{CartId, CartItemId, ProductId, UserId};

use super::RepositoryError;
use crate::models::{Cart, CartLine};

/// Internal row type for cart line queries (product fields joined in).
#[derive(Debug, sqlx::FromRow)]
struct CartLineRow {
    id: i32,
    product_id: i32,
    name: String,
    unit_price: Decimal,
    image: Option<String>,
    quantity: i32,
    color: Option<String>,
    size: Option<String>,
}

impl From<CartLineRow> for CartLine {
    fn from(row: CartLineRow) -> Self {
        Self {
            id: CartItemId::new(row.id),
            product_id: ProductId::new(row.product_id),
            name: row.name,
            unit_price: row.unit_price,
            image: row.image,
            quantity: row.quantity,
            color: row.color,
            size: row.size,
        }
    }
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the user's cart with display fields joined in.
    ///
    /// Returns `None` when the user has never added anything; callers treat
    /// that as an empty cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_for_user(&self, user_id: UserId) -> Result<Option<Cart>, RepositoryError> {
        let cart: Option<(i32, DateTime<Utc>)> =
            sqlx::query_as("SELECT id, updated_at FROM carts WHERE user_id = $1")
                .bind(user_id.as_i32())
                .fetch_optional(self.pool)
                .await?;

        let Some((cart_id, updated_at)) = cart else {
            return Ok(None);
        };

        let rows = sqlx::query_as::<_, CartLineRow>(
            "SELECT ci.id, ci.product_id, p.name,
                    COALESCE(p.sale_price, p.price) AS unit_price,
                    (p.images)[1] AS image,
                    ci.quantity, ci.color, ci.size
             FROM cart_items ci
             JOIN products p ON p.id = ci.product_id
             WHERE ci.cart_id = $1
             ORDER BY ci.id",
        )
        .bind(cart_id)
        .fetch_all(self.pool)
        .await?;

        Ok(Some(Cart {
            id: CartId::new(cart_id),
            items: rows.into_iter().map(Into::into).collect(),
            updated_at,
        }))
    }

    /// Get the user's cart ID, creating the cart if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_or_create(&self, user_id: UserId) -> Result<CartId, RepositoryError> {
        let (id,): (i32,) = sqlx::query_as(
            "INSERT INTO carts (user_id) VALUES ($1)
             ON CONFLICT (user_id) DO UPDATE SET updated_at = now()
             RETURNING id",
        )
        .bind(user_id.as_i32())
        .fetch_one(self.pool)
        .await?;

        Ok(CartId::new(id))
    }

    /// Add a line, merging quantity into an existing line with the same
    /// (product, color, size) key.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn add_line(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
        color: Option<&str>,
        size: Option<&str>,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO cart_items (cart_id, product_id, quantity, color, size)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (cart_id, product_id, coalesce(color, ''), coalesce(size, ''))
             DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity",
        )
        .bind(cart_id.as_i32())
        .bind(product_id.as_i32())
        .bind(quantity)
        .bind(color)
        .bind(size)
        .execute(self.pool)
        .await?;

        self.touch(cart_id).await
    }

    /// Set the quantity of an existing line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no line matches the key.
    pub async fn set_line_quantity(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        color: Option<&str>,
        size: Option<&str>,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE cart_items SET quantity = $5
             WHERE cart_id = $1 AND product_id = $2
               AND color IS NOT DISTINCT FROM $3
               AND size IS NOT DISTINCT FROM $4",
        )
        .bind(cart_id.as_i32())
        .bind(product_id.as_i32())
        .bind(color)
        .bind(size)
        .bind(quantity)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.touch(cart_id).await
    }

    /// Remove the line matching the (product, color, size) key.
    ///
    /// Removing a line that is not present is not an error - the cart ends
    /// up in the requested state either way.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove_line(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        color: Option<&str>,
        size: Option<&str>,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "DELETE FROM cart_items
             WHERE cart_id = $1 AND product_id = $2
               AND color IS NOT DISTINCT FROM $3
               AND size IS NOT DISTINCT FROM $4",
        )
        .bind(cart_id.as_i32())
        .bind(product_id.as_i32())
        .bind(color)
        .bind(size)
        .execute(self.pool)
        .await?;

        self.touch(cart_id).await
    }

    /// Remove every line from the cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn clear(&self, cart_id: CartId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart_id.as_i32())
            .execute(self.pool)
            .await?;

        self.touch(cart_id).await
    }

    async fn touch(&self, cart_id: CartId) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE carts SET updated_at = now() WHERE id = $1")
            .bind(cart_id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
