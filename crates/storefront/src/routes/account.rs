//! Account route handlers: profile, password, addresses, payment methods.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use furnspace_core::{AddressId, PaymentMethodId};

use crate::db::{AddressFields, AddressRepository, PaymentMethodRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::{Address, PaymentMethod, User};
use crate::services::auth::AuthService;
use crate::services::checkout::mask_card_number;
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Profile update request; absent fields keep their current value.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

/// Password change request.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Address create/update request.
#[derive(Debug, Deserialize)]
pub struct AddressRequest {
    pub address: String,
    pub apartment: Option<String>,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: String,
}

/// Payment method create request. The card number is reduced to its last
/// four digits before anything is stored.
#[derive(Debug, Deserialize)]
pub struct CreatePaymentMethodRequest {
    pub cardholder_name: String,
    pub card_number: String,
    pub expiry_month: String,
    pub expiry_year: String,
}

/// Profile response.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: User,
}

/// Address list response.
#[derive(Debug, Serialize)]
pub struct AddressListResponse {
    pub addresses: Vec<Address>,
}

/// Payment method list response.
#[derive(Debug, Serialize)]
pub struct PaymentMethodListResponse {
    pub payment_methods: Vec<PaymentMethod>,
}

/// Generic message response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl AddressRequest {
    fn into_fields(self) -> Result<AddressFields> {
        let require = |value: String, name: &str| -> Result<String> {
            let trimmed = value.trim().to_owned();
            if trimmed.is_empty() {
                return Err(AppError::BadRequest(format!("{name} is required")));
            }
            Ok(trimmed)
        };

        Ok(AddressFields {
            address: require(self.address, "address")?,
            apartment: self
                .apartment
                .map(|a| a.trim().to_owned())
                .filter(|a| !a.is_empty()),
            city: require(self.city, "city")?,
            state: require(self.state, "state")?,
            country: require(self.country, "country")?,
            zip_code: require(self.zip_code, "zip_code")?,
        })
    }
}

// =============================================================================
// Profile
// =============================================================================

/// Current user's profile.
pub async fn profile(State(state): State<AppState>, user: CurrentUser) -> Result<impl IntoResponse> {
    let users = UserRepository::new(state.pool());
    let user = users
        .get_by_id(user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

    Ok(Json(ProfileResponse { user }))
}

/// Update profile fields.
pub async fn update_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse> {
    let users = UserRepository::new(state.pool());
    let user = users
        .update_profile(
            user.id,
            body.first_name.as_deref().map(str::trim).filter(|s| !s.is_empty()),
            body.last_name.as_deref().map(str::trim).filter(|s| !s.is_empty()),
            body.phone.as_deref().map(str::trim).filter(|s| !s.is_empty()),
        )
        .await?;

    Ok(Json(ProfileResponse { user }))
}

/// Change the current user's password.
pub async fn change_password(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse> {
    AuthService::new(
        state.pool(),
        state.tokens(),
        state.blacklist(),
        state.mailer(),
        state.config().otp_ttl_secs,
    )
    .change_password(user.id, &body.current_password, &body.new_password)
    .await?;

    Ok(Json(MessageResponse {
        message: "Password updated successfully.".to_string(),
    }))
}

// =============================================================================
// Addresses
// =============================================================================

/// List the current user's addresses.
pub async fn addresses(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<impl IntoResponse> {
    let repo = AddressRepository::new(state.pool());
    let addresses = repo.list_for_user(user.id).await?;

    Ok(Json(AddressListResponse { addresses }))
}

/// Save a new address.
pub async fn create_address(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<AddressRequest>,
) -> Result<impl IntoResponse> {
    let fields = body.into_fields()?;
    let repo = AddressRepository::new(state.pool());
    let address = repo.create(user.id, &fields).await?;

    Ok((StatusCode::CREATED, Json(address)))
}

/// Update an address.
pub async fn update_address(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
    Json(body): Json<AddressRequest>,
) -> Result<impl IntoResponse> {
    let fields = body.into_fields()?;
    let repo = AddressRepository::new(state.pool());
    let address = repo
        .update(user.id, AddressId::new(id), &fields)
        .await
        .map_err(not_found_as("Address"))?;

    Ok(Json(address))
}

/// Delete an address.
pub async fn delete_address(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let repo = AddressRepository::new(state.pool());
    repo.delete(user.id, AddressId::new(id))
        .await
        .map_err(not_found_as("Address"))?;

    Ok(Json(MessageResponse {
        message: "Address deleted successfully.".to_string(),
    }))
}

/// Make an address the default.
pub async fn set_default_address(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let repo = AddressRepository::new(state.pool());
    repo.set_default(user.id, AddressId::new(id))
        .await
        .map_err(not_found_as("Address"))?;

    Ok(Json(MessageResponse {
        message: "Default address updated.".to_string(),
    }))
}

// =============================================================================
// Payment Methods
// =============================================================================

/// List the current user's saved cards.
pub async fn payment_methods(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<impl IntoResponse> {
    let repo = PaymentMethodRepository::new(state.pool());
    let payment_methods = repo.list_for_user(user.id).await?;

    Ok(Json(PaymentMethodListResponse { payment_methods }))
}

/// Save a new card, masked down to its last four digits.
pub async fn create_payment_method(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<CreatePaymentMethodRequest>,
) -> Result<impl IntoResponse> {
    let cardholder = body.cardholder_name.trim();
    if cardholder.is_empty() {
        return Err(AppError::BadRequest("cardholder_name is required".to_string()));
    }
    let last4 = mask_card_number(&body.card_number)?;

    let month = body.expiry_month.trim();
    let year = body.expiry_year.trim();
    if month.is_empty() || year.is_empty() {
        return Err(AppError::BadRequest("expiry_month and expiry_year are required".to_string()));
    }

    let repo = PaymentMethodRepository::new(state.pool());
    let payment_method = repo
        .create(user.id, cardholder, &last4, month, year)
        .await?;

    Ok((StatusCode::CREATED, Json(payment_method)))
}

/// Delete a saved card.
pub async fn delete_payment_method(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let repo = PaymentMethodRepository::new(state.pool());
    repo.delete(user.id, PaymentMethodId::new(id))
        .await
        .map_err(not_found_as("Payment method"))?;

    Ok(Json(MessageResponse {
        message: "Payment method deleted successfully.".to_string(),
    }))
}

/// Make a saved card the default.
pub async fn set_default_payment_method(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let repo = PaymentMethodRepository::new(state.pool());
    repo.set_default(user.id, PaymentMethodId::new(id))
        .await
        .map_err(not_found_as("Payment method"))?;

    Ok(Json(MessageResponse {
        message: "Default payment method updated.".to_string(),
    }))
}

/// Map a repository `NotFound` to a 404 with a named resource; everything
/// else passes through as a database error.
fn not_found_as(what: &'static str) -> impl Fn(crate::db::RepositoryError) -> AppError {
    move |err| match err {
        crate::db::RepositoryError::NotFound => AppError::NotFound(what.to_string()),
        other => AppError::Database(other),
    }
}
