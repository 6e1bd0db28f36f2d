//! Admin authentication route handlers.

use axum::{Json, extract::State, response::IntoResponse};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::AdminUser;
use crate::services::auth::AdminAuthService;
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub admin: AdminUser,
    pub access_token: String,
    pub access_expires_at: i64,
}

/// Log in as an admin.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let auth = AdminAuthService::new(state.pool(), state.tokens());
    let (admin, token) = auth.login(&body.email, &body.password).await?;

    Ok(Json(LoginResponse {
        message: "Login successful.".to_string(),
        admin,
        access_token: token.token,
        access_expires_at: token.expires_at,
    }))
}
