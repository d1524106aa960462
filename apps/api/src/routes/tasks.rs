//! Task board routes: create, list unclaimed, claim.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use parlor_core::Task;
use parlor_engine::CreateTaskRequest;

use crate::auth::Caller;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateTaskBody {
    pub title: String,
    #[serde(default)]
    pub notes: Option<String>,
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Json(body): Json<CreateTaskBody>,
) -> Result<Json<Task>, ApiError> {
    let task = state
        .tasks
        .create_task(
            &caller,
            CreateTaskRequest {
                title: body.title,
                notes: body.notes,
            },
        )
        .await?;
    Ok(Json(task))
}

pub async fn list_unclaimed(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Task>>, ApiError> {
    Ok(Json(state.tasks.list_unclaimed().await?))
}

pub async fn claim(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(state.tasks.claim(&caller, &id).await?))
}
