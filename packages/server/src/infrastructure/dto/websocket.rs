//! WebSocket frame DTOs.
//!
//! Every frame is a JSON object with a kebab-case `type` discriminator and
//! camelCase fields, e.g. `{"type":"join-room","roomId":"123"}`.

use serde::{Deserialize, Serialize};

/// Client → server frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    JoinRoom {
        room_id: String,
    },
    Message {
        room_id: String,
        text: String,
    },
    /// `target_id` is advisory only; signaling fans out to the whole room
    Offer {
        room_id: String,
        #[serde(default)]
        target_id: Option<String>,
        sdp: serde_json::Value,
    },
    Answer {
        room_id: String,
        #[serde(default)]
        target_id: Option<String>,
        sdp: serde_json::Value,
    },
    Candidate {
        room_id: String,
        #[serde(default)]
        target_id: Option<String>,
        candidate: serde_json::Value,
    },
}

/// Server → client frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    Welcome {
        peer_id: String,
    },
    UserConnected {
        peer_id: String,
    },
    UserDisconnected {
        peer_id: String,
    },
    UserCount {
        count: usize,
    },
    ChatHistory {
        messages: Vec<ChatEntry>,
    },
    Message {
        text: String,
        timestamp: i64,
    },
    Offer {
        from_peer_id: String,
        sdp: serde_json::Value,
    },
    Answer {
        from_peer_id: String,
        sdp: serde_json::Value,
    },
    Candidate {
        from_peer_id: String,
        candidate: serde_json::Value,
    },
}

/// One chat history entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub text: String,
    /// Unix timestamp (milliseconds)
    pub timestamp: i64,
}
