//! Slot grid routes: generate a day's grid, list, delete.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::{json, Value};

use parlor_core::Slot;
use parlor_engine::GenerateSlotsRequest;

use crate::auth::Caller;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateSlotsBody {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub duration_minutes: u32,
    pub max_bookings: i64,
}

pub async fn generate(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Json(body): Json<GenerateSlotsBody>,
) -> Result<Json<Vec<Slot>>, ApiError> {
    let slots = state
        .slots
        .generate(
            &caller,
            GenerateSlotsRequest {
                date: body.date,
                start_time: body.start_time,
                end_time: body.end_time,
                duration_minutes: body.duration_minutes,
                max_bookings: body.max_bookings,
            },
        )
        .await?;
    Ok(Json(slots))
}

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub date: Option<NaiveDate>,
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<Vec<Slot>>, ApiError> {
    Ok(Json(state.slots.list(query.date).await?))
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.slots.delete(&caller, &id).await?;
    Ok(Json(json!({ "deleted": id })))
}
