//! HTTP endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::{
    domain::RoomIdFactory,
    infrastructure::dto::http::RoomSummaryDto,
    ui::state::AppState,
    usecase::GetRoomDetailError,
};

/// Browser client, with `{{ROOM_ID}}` as the room placeholder
const ROOM_PAGE: &str = include_str!("../../../assets/room.html");

/// Send the browser to a freshly numbered room (303 See Other)
pub async fn redirect_to_new_room() -> Response {
    match RoomIdFactory::generate() {
        Ok(room_id) => {
            tracing::debug!("Redirecting to new room '{}'", room_id);
            Redirect::to(&format!("/{}", room_id)).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to generate room id: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Serve the client page for a room
pub async fn room_page(Path(room_id): Path<String>) -> Html<String> {
    Html(render_room_page(&room_id))
}

fn render_room_page(room_id: &str) -> String {
    ROOM_PAGE.replace(
        "{{ROOM_ID}}",
        &html_escape::encode_double_quoted_attribute(room_id),
    )
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.get_rooms_usecase.execute().await;

    // Domain Model から DTO への変換
    let room_summaries: Vec<RoomSummaryDto> = rooms.iter().map(RoomSummaryDto::from).collect();

    Json(room_summaries)
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomSummaryDto>, StatusCode> {
    match state.get_room_detail_usecase.execute(room_id).await {
        Ok(room) => Ok(Json(RoomSummaryDto::from(&room))),
        Err(GetRoomDetailError::RoomNotFound) => Err(StatusCode::NOT_FOUND),
    }
}
