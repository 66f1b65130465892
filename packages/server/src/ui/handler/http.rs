//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::{RoomId, UsersList},
    infrastructure::dto::http::RoomSummaryDto,
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Presence listing of the global scope
pub async fn get_global_users(State(state): State<Arc<AppState>>) -> Json<UsersList> {
    Json(state.router.global_users().await)
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state
        .router
        .rooms()
        .await
        .into_iter()
        .map(|(id, count)| RoomSummaryDto {
            id: id.as_str().to_string(),
            count,
        })
        .collect();

    Json(rooms)
}

/// Presence listing of one room
pub async fn get_room_users(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<UsersList>, StatusCode> {
    let room_id = RoomId::new(room_id).map_err(|_| StatusCode::NOT_FOUND)?;

    state
        .router
        .room_users(&room_id)
        .await
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}
