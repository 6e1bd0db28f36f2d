//! Customer management route handlers.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Serialize;

use furnspace_core::UserId;

use crate::db::{CustomerRepository, RepositoryError};
use crate::error::{AdminError, Result};
use crate::middleware::{CurrentAdmin, RequireWrite};
use crate::models::Customer;
use crate::state::AppState;

/// Customer list response.
#[derive(Debug, Serialize)]
pub struct CustomerListResponse {
    pub customers: Vec<Customer>,
}

/// Generic message response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Every storefront customer, newest first.
pub async fn index(State(state): State<AppState>, _admin: CurrentAdmin) -> Result<impl IntoResponse> {
    let repo = CustomerRepository::new(state.pool());
    let customers = repo.list_all().await?;

    Ok(Json(CustomerListResponse { customers }))
}

/// Allow a customer to log in again.
pub async fn activate(
    State(state): State<AppState>,
    RequireWrite(_admin): RequireWrite,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    set_active(&state, id, true).await?;

    Ok(Json(MessageResponse {
        message: "Customer activated successfully.".to_string(),
    }))
}

/// Block a customer from logging in.
pub async fn deactivate(
    State(state): State<AppState>,
    RequireWrite(_admin): RequireWrite,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    set_active(&state, id, false).await?;

    Ok(Json(MessageResponse {
        message: "Customer deactivated successfully.".to_string(),
    }))
}

/// Delete a customer. Refused while the customer has orders.
pub async fn remove(
    State(state): State<AppState>,
    RequireWrite(_admin): RequireWrite,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let repo = CustomerRepository::new(state.pool());
    repo.delete(UserId::new(id)).await.map_err(|err| match err {
        RepositoryError::NotFound => AdminError::NotFound("Customer".to_string()),
        RepositoryError::Conflict(msg) => AdminError::Conflict(msg),
        other => AdminError::Database(other),
    })?;

    Ok(Json(MessageResponse {
        message: "Customer deleted successfully.".to_string(),
    }))
}

async fn set_active(state: &AppState, id: i32, is_active: bool) -> Result<()> {
    let repo = CustomerRepository::new(state.pool());
    repo.set_active(UserId::new(id), is_active)
        .await
        .map_err(|err| match err {
            RepositoryError::NotFound => AdminError::NotFound("Customer".to_string()),
            other => AdminError::Database(other),
        })
}
