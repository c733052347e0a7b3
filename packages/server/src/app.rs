//! 依存関係の組み立て

use std::{collections::HashMap, sync::Arc};

use meetroom_shared::time::{Clock, SystemClock};
use tokio::sync::Mutex;

use crate::{
    domain::{MessagePusher, RoomRepository},
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository},
    ui::{ConnectionManager, Server},
    usecase::{
        ChatUseCase, GetRoomDetailUseCase, GetRoomsUseCase, JoinRoomUseCase, LeaveRoomUseCase,
        RelaySignalUseCase,
    },
};

/// 起動時の設定
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// ルームごとに保持する最新メッセージ数（`None` は無制限）
    pub history_limit: Option<usize>,
}

/// インメモリのレジストリとシステム時計で Server を組み立てる
pub fn build_server(config: &AppConfig) -> Server {
    build_server_with_clock(config, Arc::new(SystemClock))
}

/// タイムスタンプを `clock` から取る Server を組み立てる
pub fn build_server_with_clock(config: &AppConfig, clock: Arc<dyn Clock>) -> Server {
    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. UseCases
    // 4. ConnectionManager
    // 5. Server

    // 1. Create Repository (in-memory room registry)
    let repository: Arc<dyn RoomRepository> = Arc::new(
        InMemoryRoomRepository::new()
            .with_history_limit(config.history_limit)
            .with_clock(clock.clone()),
    );
    if let Some(limit) = config.history_limit {
        tracing::info!("Chat history capped at {} messages per room", limit);
    }

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher_clients = Arc::new(Mutex::new(HashMap::new()));
    let message_pusher: Arc<dyn MessagePusher> =
        Arc::new(WebSocketMessagePusher::new(message_pusher_clients));

    // 3. Create UseCases
    let chat_usecase = Arc::new(ChatUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        clock,
    ));
    let join_room_usecase = Arc::new(JoinRoomUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        chat_usecase.clone(),
    ));
    let leave_room_usecase = Arc::new(LeaveRoomUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let relay_signal_usecase = Arc::new(RelaySignalUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let get_rooms_usecase = Arc::new(GetRoomsUseCase::new(repository.clone()));
    let get_room_detail_usecase = Arc::new(GetRoomDetailUseCase::new(repository));

    // 4. Create ConnectionManager
    let connection_manager = Arc::new(ConnectionManager::new(
        join_room_usecase,
        leave_room_usecase,
        chat_usecase,
        relay_signal_usecase,
        message_pusher,
    ));

    // 5. Create the server
    Server::new(
        connection_manager,
        get_rooms_usecase,
        get_room_detail_usecase,
    )
}
