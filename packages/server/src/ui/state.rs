//! Shared application state.

use std::sync::Arc;

use crate::usecase::{GetRoomDetailUseCase, GetRoomsUseCase};

use super::connection::ConnectionManager;

/// Shared application state
pub struct AppState {
    /// Per-connection event dispatch
    pub connection_manager: Arc<ConnectionManager>,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（ルーム詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
}
