//! Order management route handlers.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use furnspace_core::{OrderCode, OrderId, OrderStatus};

use crate::db::{AdminOrderRepository, RepositoryError};
use crate::error::{AdminError, Result};
use crate::middleware::{CurrentAdmin, RequireWrite};
use crate::models::AdminOrder;
use crate::state::AppState;

/// Order list response.
#[derive(Debug, Serialize)]
pub struct OrderListResponse {
    pub orders: Vec<AdminOrder>,
}

/// Status update request.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Status update response.
#[derive(Debug, Serialize)]
pub struct UpdateStatusResponse {
    pub message: String,
    pub order: UpdatedOrderSummary,
}

/// The slice of the order echoed back after a status change.
#[derive(Debug, Serialize)]
pub struct UpdatedOrderSummary {
    pub id: OrderId,
    pub code: OrderCode,
    pub status: OrderStatus,
}

/// Every order, newest first.
pub async fn index(State(state): State<AppState>, _admin: CurrentAdmin) -> Result<impl IntoResponse> {
    let repo = AdminOrderRepository::new(state.pool());
    let orders = repo.list_all().await?;

    Ok(Json(OrderListResponse { orders }))
}

/// A single order with its line items.
pub async fn show(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let repo = AdminOrderRepository::new(state.pool());
    let order = repo
        .get(OrderId::new(id))
        .await?
        .ok_or_else(|| AdminError::NotFound("Order".to_string()))?;

    Ok(Json(order))
}

/// Set an order's fulfillment status.
///
/// Returned is not settable here - it is reachable only through the
/// storefront return flow, which also settles the refund.
pub async fn update_status(
    State(state): State<AppState>,
    RequireWrite(_admin): RequireWrite,
    Path(id): Path<i32>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse> {
    let status = body.status.parse::<OrderStatus>().ok().filter(|s| {
        OrderStatus::ADMIN_SETTABLE.contains(s)
    });
    let Some(status) = status else {
        let allowed = OrderStatus::ADMIN_SETTABLE
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(AdminError::BadRequest(format!(
            "Invalid status. Must be one of: {allowed}"
        )));
    };

    let repo = AdminOrderRepository::new(state.pool());
    let order = repo
        .get(OrderId::new(id))
        .await?
        .ok_or_else(|| AdminError::NotFound("Order".to_string()))?;

    repo.set_status(order.id, status).await.map_err(|err| match err {
        RepositoryError::NotFound => AdminError::NotFound("Order".to_string()),
        other => AdminError::Database(other),
    })?;

    Ok(Json(UpdateStatusResponse {
        message: "Order status updated successfully.".to_string(),
        order: UpdatedOrderSummary {
            id: order.id,
            code: order.code,
            status,
        },
    }))
}
