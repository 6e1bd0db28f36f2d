//! Order route handlers: history, detail, cancel, return.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use furnspace_core::OrderId;

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::{Order, WalletEntry};
use crate::services::checkout::CheckoutService;
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Cancel/return request body.
#[derive(Debug, Deserialize)]
pub struct ReasonRequest {
    pub reason: String,
}

/// Order list response.
#[derive(Debug, Serialize)]
pub struct OrderListResponse {
    pub orders: Vec<Order>,
}

/// Response to a cancellation.
#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub message: String,
    pub order: Order,
}

/// Wallet summary included when a return triggered a refund.
#[derive(Debug, Serialize)]
pub struct RefundedWallet {
    pub balance: Decimal,
    pub last_transaction: WalletEntry,
}

/// Response to a return.
#[derive(Debug, Serialize)]
pub struct ReturnResponse {
    pub message: String,
    pub order: Order,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet: Option<RefundedWallet>,
}

// =============================================================================
// Handlers
// =============================================================================

/// The current user's orders, newest first.
pub async fn index(State(state): State<AppState>, user: CurrentUser) -> Result<impl IntoResponse> {
    let orders = OrderRepository::new(state.pool());
    let orders = orders.list_for_user(user.id).await?;

    Ok(Json(OrderListResponse { orders }))
}

/// A single order; 404 unless it exists and belongs to the caller.
pub async fn show(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let orders = OrderRepository::new(state.pool());
    let order = orders
        .get_for_user(OrderId::new(id), user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

    Ok(Json(order))
}

/// Cancel an order that has not shipped yet.
pub async fn cancel(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
    Json(body): Json<ReasonRequest>,
) -> Result<impl IntoResponse> {
    let checkout = CheckoutService::new(state.pool(), state.config().tax_rate);
    let order = checkout
        .cancel_order(user.id, OrderId::new(id), &body.reason)
        .await?;

    Ok(Json(CancelResponse {
        message: "Order cancelled successfully.".to_string(),
        order,
    }))
}

/// Return a delivered order, crediting the wallet when it was paid.
pub async fn return_order(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
    Json(body): Json<ReasonRequest>,
) -> Result<impl IntoResponse> {
    let checkout = CheckoutService::new(state.pool(), state.config().tax_rate);
    let outcome = checkout
        .return_order(user.id, OrderId::new(id), &body.reason)
        .await?;

    let (message, wallet) = match outcome.refund {
        Some(refund) => (
            "Order returned and refund processed successfully.".to_string(),
            Some(RefundedWallet {
                balance: refund.balance,
                last_transaction: refund.entry,
            }),
        ),
        None => ("Order returned successfully.".to_string(), None),
    };

    Ok(Json(ReturnResponse {
        message,
        order: outcome.order,
        wallet,
    }))
}
