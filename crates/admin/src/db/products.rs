//! Product repository, full read/write.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use furnspace_core::{ProductId, Variant};

use super::RepositoryError;
use crate::models::AdminProduct;

/// Internal row type for `products` queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    description: String,
    sku: Option<String>,
    brand_id: Option<String>,
    category_id: String,
    tags: Vec<String>,
    price: Decimal,
    sale_price: Option<Decimal>,
    cost_per_item: Option<Decimal>,
    stock: i32,
    low_stock_threshold: i32,
    images: Vec<String>,
    variants: Json<Vec<Variant>>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for AdminProduct {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            sku: row.sku,
            brand_id: row.brand_id,
            category_id: row.category_id,
            tags: row.tags,
            price: row.price,
            sale_price: row.sale_price,
            cost_per_item: row.cost_per_item,
            stock: row.stock,
            low_stock_threshold: row.low_stock_threshold,
            images: row.images,
            variants: row.variants.0,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const PRODUCT_COLUMNS: &str = "id, name, description, sku, brand_id, category_id, tags, price, \
     sale_price, cost_per_item, stock, low_stock_threshold, images, variants, is_active, \
     created_at, updated_at";

/// Fields for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub sku: Option<String>,
    pub brand_id: Option<String>,
    pub category_id: String,
    pub tags: Vec<String>,
    pub price: Decimal,
    pub sale_price: Option<Decimal>,
    pub cost_per_item: Option<Decimal>,
    pub stock: i32,
    pub low_stock_threshold: Option<i32>,
    pub images: Vec<String>,
    pub variants: Vec<Variant>,
}

/// Partial update; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub brand_id: Option<String>,
    pub category_id: Option<String>,
    pub tags: Option<Vec<String>>,
    pub price: Option<Decimal>,
    pub sale_price: Option<Decimal>,
    pub cost_per_item: Option<Decimal>,
    pub stock: Option<i32>,
    pub low_stock_threshold: Option<i32>,
    pub images: Option<Vec<String>>,
    pub variants: Option<Vec<Variant>>,
    pub is_active: Option<bool>,
}

/// Repository for back-office product operations.
pub struct AdminProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every product, newest first, including inactive ones.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<AdminProduct>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<AdminProduct>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, new: &NewProduct) -> Result<AdminProduct, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO products (name, description, sku, brand_id, category_id, tags, price,
                                   sale_price, cost_per_item, stock, low_stock_threshold,
                                   images, variants)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, COALESCE($11, 5), $12, $13)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.sku.as_deref())
        .bind(new.brand_id.as_deref())
        .bind(&new.category_id)
        .bind(&new.tags)
        .bind(new.price)
        .bind(new.sale_price)
        .bind(new.cost_per_item)
        .bind(new.stock)
        .bind(new.low_stock_threshold)
        .bind(&new.images)
        .bind(Json(&new.variants))
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn update(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<AdminProduct, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE products
             SET name = COALESCE($2, name),
                 description = COALESCE($3, description),
                 sku = COALESCE($4, sku),
                 brand_id = COALESCE($5, brand_id),
                 category_id = COALESCE($6, category_id),
                 tags = COALESCE($7, tags),
                 price = COALESCE($8, price),
                 sale_price = COALESCE($9, sale_price),
                 cost_per_item = COALESCE($10, cost_per_item),
                 stock = COALESCE($11, stock),
                 low_stock_threshold = COALESCE($12, low_stock_threshold),
                 images = COALESCE($13, images),
                 variants = COALESCE($14, variants),
                 is_active = COALESCE($15, is_active),
                 updated_at = now()
             WHERE id = $1
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(patch.name.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.sku.as_deref())
        .bind(patch.brand_id.as_deref())
        .bind(patch.category_id.as_deref())
        .bind(patch.tags.as_deref())
        .bind(patch.price)
        .bind(patch.sale_price)
        .bind(patch.cost_per_item)
        .bind(patch.stock)
        .bind(patch.low_stock_threshold)
        .bind(patch.images.as_deref())
        .bind(patch.variants.as_ref().map(Json))
        .bind(patch.is_active)
        .fetch_optional(self.pool)
        .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Soft-delete: deactivate the product so the storefront hides it.
    ///
    /// A hard DELETE would break the foreign keys from historical cart
    /// lines; deactivation keeps them intact.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn deactivate(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE products SET is_active = FALSE, updated_at = now() WHERE id = $1",
        )
        .bind(id.as_i32())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
