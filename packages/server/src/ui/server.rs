//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::usecase::{GetRoomDetailUseCase, GetRoomsUseCase};

use super::{
    connection::ConnectionManager,
    error::ServerError,
    handler::{
        get_room_detail, get_rooms, health_check, redirect_to_new_room, room_page,
        websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Room coordinator server
///
/// This struct encapsulates the HTTP/WebSocket surface and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(connection_manager, get_rooms_usecase, get_room_detail_usecase);
/// server.run("0.0.0.0".to_string(), 3000).await?;
/// ```
pub struct Server {
    /// ConnectionManager（接続ごとのイベント振り分け）
    connection_manager: Arc<ConnectionManager>,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（ルーム詳細取得のユースケース）
    get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `connection_manager` - Dispatcher for WebSocket sessions
    /// * `get_rooms_usecase` - UseCase for getting rooms list
    /// * `get_room_detail_usecase` - UseCase for getting room detail
    pub fn new(
        connection_manager: Arc<ConnectionManager>,
        get_rooms_usecase: Arc<GetRoomsUseCase>,
        get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    ) -> Self {
        Self {
            connection_manager,
            get_rooms_usecase,
            get_room_detail_usecase,
        }
    }

    /// Build the router with every route and the shared state attached
    pub fn router(self) -> Router {
        let app_state = Arc::new(AppState {
            connection_manager: self.connection_manager,
            get_rooms_usecase: self.get_rooms_usecase,
            get_room_detail_usecase: self.get_room_detail_usecase,
        });

        Router::new()
            // ページ
            .route("/", get(redirect_to_new_room))
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{room_id}", get(get_room_detail))
            .route("/{room_id}", get(room_page))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Serve on an already bound listener until a shutdown signal arrives
    pub async fn serve(self, listener: TcpListener) -> Result<(), ServerError> {
        let app = self.router();

        if let Ok(addr) = listener.local_addr() {
            tracing::info!("Room coordinator listening on {}", addr);
            tracing::info!("Open http://{}/ in a browser to start a room", addr);
        }
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }

    /// Run the server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "0.0.0.0")
    /// * `port` - The port number to bind to (e.g., 3000)
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the address cannot be bound, and
    /// [`ServerError::Serve`] if the server fails while running.
    pub async fn run(self, host: String, port: u16) -> Result<(), ServerError> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: bind_addr.clone(),
                source,
            })?;

        self.serve(listener).await
    }
}
