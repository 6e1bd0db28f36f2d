//! Checkout route handler.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::Order;
use crate::services::checkout::{CheckoutInput, CheckoutService};
use crate::state::AppState;

/// Response to a successful checkout.
#[derive(Debug, Serialize)]
pub struct PlaceOrderResponse {
    pub message: String,
    pub order: Order,
}

/// Place an order from the user's current cart.
pub async fn place_order(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<CheckoutInput>,
) -> Result<impl IntoResponse> {
    let checkout = CheckoutService::new(state.pool(), state.config().tax_rate);
    let order = checkout.place_order(user.id, body).await?;

    Ok((
        StatusCode::CREATED,
        Json(PlaceOrderResponse {
            message: "Order placed successfully.".to_string(),
            order,
        }),
    ))
}
