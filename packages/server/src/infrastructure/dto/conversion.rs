//! Conversion logic between DTOs and domain entities.

use meetroom_shared::time::timestamp_to_rfc3339;

use crate::domain::{ChatMessage, Notification, Room, SignalKind};
use crate::infrastructure::dto::{
    http::RoomSummaryDto,
    websocket::{ChatEntry, ServerMessage},
};

// ========================================
// Domain → DTO
// ========================================

impl From<ChatMessage> for ChatEntry {
    fn from(model: ChatMessage) -> Self {
        Self {
            text: model.text.into_string(),
            timestamp: model.timestamp.value(),
        }
    }
}

impl From<Notification> for ServerMessage {
    fn from(notification: Notification) -> Self {
        match notification {
            Notification::Welcome { peer_id } => Self::Welcome {
                peer_id: peer_id.into_string(),
            },
            Notification::PeerConnected { peer_id } => Self::UserConnected {
                peer_id: peer_id.into_string(),
            },
            Notification::PeerDisconnected { peer_id } => Self::UserDisconnected {
                peer_id: peer_id.into_string(),
            },
            Notification::MemberCount { count } => Self::UserCount { count },
            Notification::ChatHistory { messages } => Self::ChatHistory {
                messages: messages.into_iter().map(ChatEntry::from).collect(),
            },
            Notification::ChatPosted { message } => Self::Message {
                text: message.text.into_string(),
                timestamp: message.timestamp.value(),
            },
            Notification::Signal {
                kind,
                from,
                payload,
            } => {
                let from_peer_id = from.into_string();
                let payload = payload.into_value();
                match kind {
                    SignalKind::Offer => Self::Offer {
                        from_peer_id,
                        sdp: payload,
                    },
                    SignalKind::Answer => Self::Answer {
                        from_peer_id,
                        sdp: payload,
                    },
                    SignalKind::Candidate => Self::Candidate {
                        from_peer_id,
                        candidate: payload,
                    },
                }
            }
        }
    }
}

impl From<&Room> for RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            member_count: room.member_count(),
            message_count: room.message_count(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionId, MessageText, RoomId, SignalPayload, Timestamp};
    use serde_json::json;

    #[test]
    fn test_chat_posted_to_message_dto() {
        // テスト項目: ChatPosted が message DTO に変換される
        // given (前提条件):
        let notification = Notification::ChatPosted {
            message: ChatMessage::new(MessageText::new("hi".to_string()), Timestamp::new(42)),
        };

        // when (操作):
        let dto: ServerMessage = notification.into();

        // then (期待する結果):
        assert_eq!(
            dto,
            ServerMessage::Message {
                text: "hi".to_string(),
                timestamp: 42,
            }
        );
    }

    #[test]
    fn test_candidate_signal_uses_candidate_field() {
        // テスト項目: candidate シグナルは candidate フィールドにペイロードを載せる
        // given (前提条件):
        let notification = Notification::Signal {
            kind: SignalKind::Candidate,
            from: ConnectionId::new("alice".to_string()).unwrap(),
            payload: SignalPayload::new(json!({"candidate": "a=1"})),
        };

        // when (操作):
        let dto: ServerMessage = notification.into();

        // then (期待する結果):
        assert_eq!(
            dto,
            ServerMessage::Candidate {
                from_peer_id: "alice".to_string(),
                candidate: json!({"candidate": "a=1"}),
            }
        );
    }

    #[test]
    fn test_room_to_summary_dto() {
        // テスト項目: Room が RoomSummaryDto に変換される
        // given (前提条件):
        let mut room = Room::new(
            RoomId::new("123".to_string()).unwrap(),
            Timestamp::new(1672531200000),
        );
        room.add_member(ConnectionId::new("alice".to_string()).unwrap());
        room.post_message(MessageText::new("hello".to_string()), Timestamp::new(1));

        // when (操作):
        let dto = RoomSummaryDto::from(&room);

        // then (期待する結果):
        assert_eq!(dto.id, "123");
        assert_eq!(dto.member_count, 1);
        assert_eq!(dto.message_count, 1);
        assert_eq!(dto.created_at, "2023-01-01T00:00:00.000Z");
    }
}
