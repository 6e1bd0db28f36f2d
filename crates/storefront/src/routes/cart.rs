//! Cart route handlers.
//!
//! A missing cart row reads as an empty cart; the first add creates it.
//! Lines are keyed by (product, color, size) and merge additively.

use axum::{Json, extract::State, response::IntoResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use furnspace_core::ProductId;

use crate::db::{CartRepository, ProductRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::{Cart, CartLine};
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Add-to-cart request. Accepts `id` as an alias for `product_id`.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    #[serde(alias = "id")]
    pub product_id: i32,
    pub quantity: i32,
    pub color: Option<String>,
    pub size: Option<String>,
}

/// Set-quantity request for an existing line.
#[derive(Debug, Deserialize)]
pub struct UpdateCartItemRequest {
    pub product_id: i32,
    pub quantity: i32,
    pub color: Option<String>,
    pub size: Option<String>,
}

/// Remove-line request.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartRequest {
    pub product_id: i32,
    pub color: Option<String>,
    pub size: Option<String>,
}

/// Cart display data returned by every cart endpoint.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartLine>,
    pub subtotal: Decimal,
    pub item_count: i64,
}

impl CartView {
    /// An empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            subtotal: Decimal::ZERO,
            item_count: 0,
        }
    }
}

impl From<Cart> for CartView {
    fn from(cart: Cart) -> Self {
        let subtotal = cart.subtotal();
        let item_count = cart.item_count();
        Self {
            items: cart.items,
            subtotal,
            item_count,
        }
    }
}

/// Cart response with a message.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub message: String,
    pub cart: CartView,
}

// =============================================================================
// Handlers
// =============================================================================

/// The current user's cart.
pub async fn show(State(state): State<AppState>, user: CurrentUser) -> Result<impl IntoResponse> {
    let cart_view = load_cart_view(&state, &user).await?;
    Ok(Json(cart_view))
}

/// Add a line, merging into an existing line with the same variant key.
pub async fn add(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<AddToCartRequest>,
) -> Result<impl IntoResponse> {
    if body.quantity <= 0 {
        return Err(AppError::BadRequest("quantity must be positive".to_string()));
    }

    let products = ProductRepository::new(state.pool());
    let product_id = ProductId::new(body.product_id);
    products
        .get_active(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

    let carts = CartRepository::new(state.pool());
    let cart_id = carts.get_or_create(user.id).await?;
    carts
        .add_line(
            cart_id,
            product_id,
            body.quantity,
            body.color.as_deref(),
            body.size.as_deref(),
        )
        .await?;

    let cart_view = load_cart_view(&state, &user).await?;
    Ok(Json(CartResponse {
        message: "Product added to cart successfully.".to_string(),
        cart: cart_view,
    }))
}

/// Set the quantity of an existing line.
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<UpdateCartItemRequest>,
) -> Result<impl IntoResponse> {
    if body.quantity <= 0 {
        return Err(AppError::BadRequest("quantity must be positive".to_string()));
    }

    let carts = CartRepository::new(state.pool());
    let cart = carts
        .get_for_user(user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Cart".to_string()))?;

    carts
        .set_line_quantity(
            cart.id,
            ProductId::new(body.product_id),
            body.color.as_deref(),
            body.size.as_deref(),
            body.quantity,
        )
        .await
        .map_err(|err| match err {
            RepositoryError::NotFound => AppError::NotFound("Product in cart".to_string()),
            other => AppError::Database(other),
        })?;

    let cart_view = load_cart_view(&state, &user).await?;
    Ok(Json(CartResponse {
        message: "Cart item updated successfully.".to_string(),
        cart: cart_view,
    }))
}

/// Remove a line.
pub async fn remove(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<RemoveFromCartRequest>,
) -> Result<impl IntoResponse> {
    let carts = CartRepository::new(state.pool());
    let cart = carts
        .get_for_user(user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Cart".to_string()))?;

    carts
        .remove_line(
            cart.id,
            ProductId::new(body.product_id),
            body.color.as_deref(),
            body.size.as_deref(),
        )
        .await?;

    let cart_view = load_cart_view(&state, &user).await?;
    Ok(Json(CartResponse {
        message: "Product removed from cart successfully.".to_string(),
        cart: cart_view,
    }))
}

/// Empty the cart.
pub async fn clear(State(state): State<AppState>, user: CurrentUser) -> Result<impl IntoResponse> {
    let carts = CartRepository::new(state.pool());
    let cart = carts
        .get_for_user(user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Cart".to_string()))?;

    carts.clear(cart.id).await?;

    Ok(Json(CartResponse {
        message: "Cart cleared successfully.".to_string(),
        cart: CartView::empty(),
    }))
}

async fn load_cart_view(state: &AppState, user: &CurrentUser) -> Result<CartView> {
    let carts = CartRepository::new(state.pool());
    Ok(carts
        .get_for_user(user.id)
        .await?
        .map_or_else(CartView::empty, Into::into))
}
