//! Catalog management route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use furnspace_core::{ProductId, Variant};

use crate::db::{AdminProductRepository, NewProduct, ProductPatch, RepositoryError};
use crate::error::{AdminError, Result};
use crate::middleware::{CurrentAdmin, RequireWrite};
use crate::models::AdminProduct;
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Product creation request.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    pub sku: Option<String>,
    pub brand_id: Option<String>,
    pub category_id: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub price: Decimal,
    pub sale_price: Option<Decimal>,
    pub cost_per_item: Option<Decimal>,
    pub stock: i32,
    pub low_stock_threshold: Option<i32>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

/// Partial product update request; absent fields keep their value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductRequest {
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

/// Product list response.
#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<AdminProduct>,
}

/// Generic message response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Every product, newest first, including inactive ones.
pub async fn index(State(state): State<AppState>, _admin: CurrentAdmin) -> Result<impl IntoResponse> {
    let repo = AdminProductRepository::new(state.pool());
    let products = repo.list_all().await?;

    Ok(Json(ProductListResponse { products }))
}

/// A single product.
pub async fn show(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let repo = AdminProductRepository::new(state.pool());
    let product = repo
        .get(ProductId::new(id))
        .await?
        .ok_or_else(|| AdminError::NotFound("Product".to_string()))?;

    Ok(Json(product))
}

/// Create a product.
pub async fn create(
    State(state): State<AppState>,
    RequireWrite(_admin): RequireWrite,
    Json(body): Json<CreateProductRequest>,
) -> Result<impl IntoResponse> {
    let name = body.name.trim().to_owned();
    if name.is_empty() {
        return Err(AdminError::BadRequest("name is required".to_string()));
    }
    let category_id = body.category_id.trim().to_owned();
    if category_id.is_empty() {
        return Err(AdminError::BadRequest("category_id is required".to_string()));
    }
    validate_amounts(Some(body.price), body.sale_price, Some(body.stock))?;

    let repo = AdminProductRepository::new(state.pool());
    let product = repo
        .create(&NewProduct {
            name,
            description: body.description,
            sku: body.sku,
            brand_id: body.brand_id,
            category_id,
            tags: body.tags,
            price: body.price,
            sale_price: body.sale_price,
            cost_per_item: body.cost_per_item,
            stock: body.stock,
            low_stock_threshold: body.low_stock_threshold,
            images: body.images,
            variants: body.variants,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// Apply a partial update.
pub async fn update(
    State(state): State<AppState>,
    RequireWrite(_admin): RequireWrite,
    Path(id): Path<i32>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<impl IntoResponse> {
    validate_amounts(body.price, body.sale_price, body.stock)?;

    let repo = AdminProductRepository::new(state.pool());
    let product = repo
        .update(
            ProductId::new(id),
            &ProductPatch {
                name: body.name,
                description: body.description,
                sku: body.sku,
                brand_id: body.brand_id,
                category_id: body.category_id,
                tags: body.tags,
                price: body.price,
                sale_price: body.sale_price,
                cost_per_item: body.cost_per_item,
                stock: body.stock,
                low_stock_threshold: body.low_stock_threshold,
                images: body.images,
                variants: body.variants,
                is_active: body.is_active,
            },
        )
        .await
        .map_err(|err| match err {
            RepositoryError::NotFound => AdminError::NotFound("Product".to_string()),
            other => AdminError::Database(other),
        })?;

    Ok(Json(product))
}

/// Soft-delete a product.
pub async fn remove(
    State(state): State<AppState>,
    RequireWrite(_admin): RequireWrite,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let repo = AdminProductRepository::new(state.pool());
    repo.deactivate(ProductId::new(id))
        .await
        .map_err(|err| match err {
            RepositoryError::NotFound => AdminError::NotFound("Product".to_string()),
            other => AdminError::Database(other),
        })?;

    Ok(Json(MessageResponse {
        message: "Product deactivated successfully.".to_string(),
    }))
}

/// Reject negative prices and stock.
fn validate_amounts(
    price: Option<Decimal>,
    sale_price: Option<Decimal>,
    stock: Option<i32>,
) -> Result<()> {
    if price.is_some_and(|p| p < Decimal::ZERO) {
        return Err(AdminError::BadRequest("price cannot be negative".to_string()));
    }
    if sale_price.is_some_and(|p| p < Decimal::ZERO) {
        return Err(AdminError::BadRequest("sale_price cannot be negative".to_string()));
    }
    if stock.is_some_and(|s| s < 0) {
        return Err(AdminError::BadRequest("stock cannot be negative".to_string()));
    }
    Ok(())
}
