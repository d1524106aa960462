// =============================================================================
// Route Table
// =============================================================================
//
// ```text
// ┌──────────────────────────────────────────┬───────────────┬──────────────┐
// │ Route                                    │ Engine        │ Caller       │
// ├──────────────────────────────────────────┼───────────────┼──────────────┤
// │ POST   /slots/generate                   │ slots         │ admin        │
// │ GET    /slots?date=YYYY-MM-DD            │ slots         │ anyone       │
// │ DELETE /slots/{id}                       │ slots         │ admin        │
// │ POST   /reservations                     │ booking       │ member       │
// │ GET    /reservations                     │ booking       │ member       │
// │ POST   /reservations/{id}/cancel         │ booking       │ owner/admin  │
// │ POST   /payments/confirm                 │ settlement    │ signature    │
// │ GET    /wallet                           │ settlement    │ member       │
// │ POST   /tasks                            │ tasks         │ admin        │
// │ GET    /tasks/unclaimed                  │ tasks         │ anyone       │
// │ POST   /tasks/{id}/claim                 │ tasks         │ member       │
// │ POST   /stakes                           │ stakes        │ member       │
// │ POST   /stakes/{id}/release              │ stakes        │ holder/admin │
// │ POST   /tokens/purchases                 │ stakes        │ member       │
// │ GET    /tokens/balance                   │ stakes        │ member       │
// │ GET    /tokens/activity/monthly          │ stakes        │ member       │
// │ GET    /health                           │ -             │ anyone       │
// └──────────────────────────────────────────┴───────────────┴──────────────┘
// ```
//
// =============================================================================

mod payments;
mod reservations;
mod slots;
mod stakes;
mod tasks;

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use parlor_engine::EngineError;

use crate::error::ApiError;
use crate::state::AppState;

/// Builds the full application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/slots/generate", post(slots::generate))
        .route("/slots", get(slots::list))
        .route("/slots/{id}", delete(slots::remove))
        .route(
            "/reservations",
            post(reservations::reserve).get(reservations::list_own),
        )
        .route("/reservations/{id}/cancel", post(reservations::cancel))
        .route("/payments/confirm", post(payments::confirm))
        .route("/wallet", get(payments::wallet))
        .route("/tasks", post(tasks::create))
        .route("/tasks/unclaimed", get(tasks::list_unclaimed))
        .route("/tasks/{id}/claim", post(tasks::claim))
        .route("/stakes", post(stakes::initiate))
        .route("/stakes/{id}/release", post(stakes::release))
        .route("/tokens/purchases", post(stakes::purchase))
        .route("/tokens/balance", get(stakes::balance))
        .route("/tokens/activity/monthly", get(stakes::monthly))
        .with_state(state)
}

/// Liveness probe: verifies the database answers queries.
async fn health(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    state
        .db
        .health_check()
        .await
        .map_err(|err| ApiError::from(EngineError::from(err)))?;
    Ok(Json(json!({ "status": "ok" })))
}
