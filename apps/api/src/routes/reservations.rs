//! Reservation routes: reserve, list own, cancel.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use parlor_core::{PaymentMethod, Reservation};
use parlor_engine::ReserveRequest;

use crate::auth::Caller;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReserveBody {
    pub target_id: String,
    #[serde(default)]
    pub slot_id: Option<String>,
    pub payment_method: PaymentMethod,
}

pub async fn reserve(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Json(body): Json<ReserveBody>,
) -> Result<Json<Reservation>, ApiError> {
    let reservation = state
        .booking
        .reserve(
            &caller,
            ReserveRequest {
                target_id: body.target_id,
                slot_id: body.slot_id,
                payment_method: body.payment_method,
            },
        )
        .await?;
    Ok(Json(reservation))
}

/// A reservation plus whether it still grants access right now. Cancellation
/// and subscription expiry both show up here as `active: false`.
#[derive(Debug, Serialize)]
pub struct ReservationView {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub active: bool,
}

pub async fn list_own(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
) -> Result<Json<Vec<ReservationView>>, ApiError> {
    let reservations = state.booking.list_own(&caller).await?;
    Ok(Json(
        reservations
            .into_iter()
            .map(|(reservation, active)| ReservationView {
                reservation,
                active,
            })
            .collect(),
    ))
}

pub async fn cancel(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.booking.cancel(&caller, &id).await?;
    Ok(Json(json!({ "cancelled": id })))
}
