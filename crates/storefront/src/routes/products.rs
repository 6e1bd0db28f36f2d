//! Catalog route handlers.
//!
//! Listing requires a logged-in user; product detail is public so shared
//! links keep working.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Serialize;

use furnspace_core::ProductId;

use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::Product;
use crate::services::catalog::CatalogService;
use crate::state::AppState;

/// Product listing response.
#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<Product>,
}

/// Active products, newest first.
pub async fn index(State(state): State<AppState>, _user: CurrentUser) -> Result<impl IntoResponse> {
    let catalog = CatalogService::new(state.pool(), state.catalog_cache());
    let products = catalog.list_products().await?;

    Ok(Json(ProductListResponse {
        products: products.as_ref().clone(),
    }))
}

/// A single product by ID.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let catalog = CatalogService::new(state.pool(), state.catalog_cache());
    let product = catalog
        .get_product(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

    Ok(Json(product.as_ref().clone()))
}
