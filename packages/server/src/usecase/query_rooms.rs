//! UseCase: ルーム一覧・詳細の取得（運用向けの読み取り専用 API）

use std::sync::Arc;

use thiserror::Error;

use crate::domain::{Room, RoomId, RoomRepository};

/// ルーム詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("room not found")]
    RoomNotFound,
}

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomsUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 現在存在する全ルーム（ID 順）
    pub async fn execute(&self) -> Vec<Room> {
        self.repository.list_rooms().await
    }
}

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomDetailUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, room_id: String) -> Result<Room, GetRoomDetailError> {
        let room_id = RoomId::new(room_id).map_err(|_| GetRoomDetailError::RoomNotFound)?;
        self.repository
            .find_room(&room_id)
            .await
            .ok_or(GetRoomDetailError::RoomNotFound)
    }
}
