//! Authentication route handlers.
//!
//! Registration with OTP email verification, login, token refresh, and
//! logout. All business logic lives in [`AuthService`]; handlers translate
//! between JSON and the service.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::CurrentUser;
use crate::models::User;
use crate::services::auth::{AuthService, RegisterInput, TokenPair};
use crate::services::tokens::IssuedToken;
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// OTP verification request body.
#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub verification_code: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Refresh request body.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Logout request body. The refresh token is optional; the access token
/// being revoked is the one in the Authorization header.
#[derive(Debug, Default, Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: Option<String>,
}

// =============================================================================
// Response Types
// =============================================================================

/// Response to a successful registration.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: User,
}

/// Response carrying the user and a fresh token pair.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: User,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

/// Response to a token refresh.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub message: String,
    pub access_token: String,
    pub access_expires_at: i64,
}

/// Generic message response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// =============================================================================
// Handlers
// =============================================================================

fn auth_service(state: &AppState) -> AuthService<'_> {
    AuthService::new(
        state.pool(),
        state.tokens(),
        state.blacklist(),
        state.mailer(),
        state.config().otp_ttl_secs,
    )
}

/// Start a signup: create the unverified account and email the OTP.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let user = auth_service(&state)
        .register(RegisterInput {
            first_name: body.first_name,
            last_name: body.last_name,
            email: body.email,
            password: body.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Verification code sent. Please check your email.".to_string(),
            user,
        }),
    ))
}

/// Confirm the signup OTP and log the user in.
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(body): Json<VerifyOtpRequest>,
) -> Result<impl IntoResponse> {
    let (user, tokens) = auth_service(&state)
        .verify_otp(&body.email, &body.verification_code)
        .await?;

    set_sentry_user(&user.id, Some(user.email.as_str()));

    Ok(Json(AuthResponse {
        message: "Email verified successfully. Welcome to your account!".to_string(),
        user,
        tokens,
    }))
}

/// Log in with email and password.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let (user, tokens) = auth_service(&state).login(&body.email, &body.password).await?;

    set_sentry_user(&user.id, Some(user.email.as_str()));

    Ok(Json(AuthResponse {
        message: "Login successful.".to_string(),
        user,
        tokens,
    }))
}

/// Exchange a refresh token for a new access token.
pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<impl IntoResponse> {
    let IssuedToken { token, expires_at } =
        auth_service(&state).refresh(&body.refresh_token).await?;

    Ok(Json(RefreshResponse {
        message: "Token refreshed successfully.".to_string(),
        access_token: token,
        access_expires_at: expires_at,
    }))
}

/// Log out: blacklist the presented tokens.
pub async fn logout(
    State(state): State<AppState>,
    user: CurrentUser,
    body: Option<Json<LogoutRequest>>,
) -> Result<impl IntoResponse> {
    let refresh_token = body.and_then(|Json(b)| b.refresh_token);

    auth_service(&state)
        .logout(&user.claims, refresh_token.as_deref())
        .await?;

    clear_sentry_user();

    Ok(Json(MessageResponse {
        message: "Logged out successfully.".to_string(),
    }))
}
