//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::ui::{connection::ConnectionManager, state::AppState};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let manager = state.connection_manager.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, manager))
}

/// Spawn a task that forwards pushed messages to the WebSocket sink
///
/// # Arguments
///
/// * `rx` - Channel receiver for messages addressed to this connection
/// * `sender` - WebSocket sink to send messages to this client
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, manager: Arc<ConnectionManager>) {
    let (sender, mut receiver) = socket.split();

    // Create a channel for this connection to receive pushed messages
    let (tx, rx) = mpsc::unbounded_channel();

    let mut session = match manager.open(tx).await {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("Failed to open connection: {}", e);
            return;
        }
    };

    let mut send_task = pusher_loop(rx, sender);

    // Frames are handled inline so that the session is only ever touched
    // from this task, in arrival order.
    loop {
        tokio::select! {
            frame = receiver.next() => {
                let msg = match frame {
                    Some(Ok(msg)) => msg,
                    Some(Err(e)) => {
                        tracing::warn!("WebSocket error on '{}': {}", session.id(), e);
                        break;
                    }
                    None => break,
                };

                match msg {
                    Message::Text(text) => {
                        tracing::debug!("Received from '{}': {}", session.id(), text.as_str());
                        manager.handle_text(&mut session, text.as_str()).await;
                    }
                    Message::Binary(_) => {
                        tracing::debug!("Ignoring binary frame from '{}'", session.id());
                    }
                    Message::Close(_) => {
                        tracing::info!("Client '{}' requested close", session.id());
                        break;
                    }
                    // Ping/pong is handled automatically by the WebSocket protocol
                    Message::Ping(_) | Message::Pong(_) => {}
                }
            }
            _ = &mut send_task => break,
        }
    }

    manager.close(&mut session).await;
    send_task.abort();
}
