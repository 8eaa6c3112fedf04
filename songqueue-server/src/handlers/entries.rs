use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use songqueue_core::{
    Entry,
    types::{CreateEntryRequest, UpdateEntryRequest},
};

use crate::infra::{
    app_state::AppState,
    errors::AppResult,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClearResponse {
    pub message: String,
    pub removed: u64,
}

/// `POST /api/v1/entries`
pub async fn create_entry_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateEntryRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Entry>)> {
    let Json(request) = payload?;
    let entry = state.queue().create_entry(request).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// `GET /api/v1/entries`
pub async fn list_entries_handler(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Entry>>> {
    let entries = state.queue().list_entries().await?;
    Ok(Json(entries))
}

/// `GET /api/v1/entries/{id}`
pub async fn get_entry_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<Entry>> {
    let Path(id) = id?;
    let entry = state.queue().get_entry(id).await?;
    Ok(Json(entry))
}

/// `PUT|PATCH /api/v1/entries/{id}`
pub async fn update_entry_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateEntryRequest>, JsonRejection>,
) -> AppResult<Json<Entry>> {
    let Path(id) = id?;
    let Json(request) = payload?;
    let entry = state.queue().update_entry(id, request).await?;
    Ok(Json(entry))
}

/// `DELETE /api/v1/entries/clear`
pub async fn clear_entries_handler(
    State(state): State<AppState>,
) -> AppResult<Json<ClearResponse>> {
    let removed = state.queue().clear_all().await?;
    Ok(Json(ClearResponse {
        message: "All songs cleared successfully".to_string(),
        removed,
    }))
}
