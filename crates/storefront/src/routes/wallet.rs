//! Wallet route handler.

use axum::{Json, extract::State, response::IntoResponse};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::db::WalletRepository;
use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::WalletEntry;
use crate::state::AppState;

/// Wallet response. Users who have never been credited read as a zero
/// balance with an empty ledger.
#[derive(Debug, Serialize)]
pub struct WalletResponse {
    pub balance: Decimal,
    pub transactions: Vec<WalletEntry>,
}

/// The current user's wallet balance and ledger, newest entries first.
pub async fn show(State(state): State<AppState>, user: CurrentUser) -> Result<impl IntoResponse> {
    let wallets = WalletRepository::new(state.pool());

    let response = match wallets.get_for_user(user.id).await? {
        Some(wallet) => WalletResponse {
            balance: wallet.balance,
            transactions: wallet.entries,
        },
        None => WalletResponse {
            balance: Decimal::ZERO,
            transactions: Vec::new(),
        },
    };

    Ok(Json(response))
}
