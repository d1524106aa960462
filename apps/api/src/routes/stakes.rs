//! Token ledger routes: locks, purchases, balances, monthly series.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use parlor_core::ledger::{MonthlySeries, TokenBalances};
use parlor_core::{ActivityLogEntry, StakeLock};
use parlor_engine::{InitiateLockRequest, RecordPurchaseRequest};

use crate::auth::Caller;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct InitiateLockBody {
    pub principal: i64,
    pub duration_months: u32,
    pub multiplier_bps: u32,
}

pub async fn initiate(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Json(body): Json<InitiateLockBody>,
) -> Result<Json<StakeLock>, ApiError> {
    let lock = state
        .stakes
        .initiate_lock(
            &caller,
            InitiateLockRequest {
                principal: body.principal,
                duration_months: body.duration_months,
                multiplier_bps: body.multiplier_bps,
            },
        )
        .await?;
    Ok(Json(lock))
}

pub async fn release(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<Json<StakeLock>, ApiError> {
    Ok(Json(state.stakes.release(&caller, &id).await?))
}

#[derive(Debug, Deserialize)]
pub struct PurchaseBody {
    pub token_amount: i64,
    #[serde(default)]
    pub amount_inr_paise: Option<i64>,
}

pub async fn purchase(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Json(body): Json<PurchaseBody>,
) -> Result<Json<ActivityLogEntry>, ApiError> {
    let entry = state
        .stakes
        .record_purchase(
            &caller,
            RecordPurchaseRequest {
                token_amount: body.token_amount,
                amount_inr_paise: body.amount_inr_paise,
            },
        )
        .await?;
    Ok(Json(entry))
}

pub async fn balance(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
) -> Result<Json<TokenBalances>, ApiError> {
    Ok(Json(state.stakes.balances(&caller).await?))
}

pub async fn monthly(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
) -> Result<Json<MonthlySeries>, ApiError> {
    Ok(Json(state.stakes.monthly_activity(&caller).await?))
}
