//! Payment confirmation callback and wallet read.
//!
//! `POST /payments/confirm` is the gateway's server-to-server callback. It
//! deliberately takes no caller headers: the HMAC signature inside the body
//! is the authentication. A forged or replayed delivery fails inside the
//! settlement engine, not here.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use parlor_core::SettlementRecord;
use parlor_engine::SettleRequest;

use crate::auth::Caller;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ConfirmPaymentBody {
    pub reservation_id: String,
    pub payment_id: String,
    pub signature: String,
}

pub async fn confirm(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ConfirmPaymentBody>,
) -> Result<Json<SettlementRecord>, ApiError> {
    let record = state
        .settlement
        .settle(SettleRequest {
            reservation_id: body.reservation_id,
            payment_id: body.payment_id,
            signature: body.signature,
        })
        .await?;
    Ok(Json(record))
}

#[derive(Debug, Serialize)]
pub struct WalletView {
    pub profile_id: String,
    pub display_name: String,
    pub balance_paise: i64,
    /// Human-readable balance, e.g. `₹1350.00`.
    pub balance_display: String,
}

pub async fn wallet(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
) -> Result<Json<WalletView>, ApiError> {
    let profile = state.settlement.wallet(&caller).await?;
    Ok(Json(WalletView {
        balance_paise: profile.wallet_balance_paise,
        balance_display: profile.wallet_balance().to_string(),
        profile_id: profile.id,
        display_name: profile.display_name,
    }))
}
