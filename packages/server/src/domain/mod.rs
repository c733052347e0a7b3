//! ドメイン層
//!
//! エンティティ、値オブジェクト、セッションの状態遷移と、
//! Infrastructure 層が実装するインターフェースを定義します。

pub mod entity;
pub mod error;
pub mod factory;
pub mod message_pusher;
pub mod notification;
pub mod repository;
pub mod session;
pub mod value_object;

pub use entity::{ChatMessage, Room};
pub use error::{MessagePushError, SessionError, ValueObjectError};
pub use factory::{ConnectionIdFactory, RoomIdFactory};
pub use message_pusher::{MessagePusher, PusherChannel};
#[cfg(test)]
pub use message_pusher::MockMessagePusher;
pub use notification::{Notification, SignalKind};
pub use repository::{RoomGuard, RoomRepository};
pub use session::{Session, SessionState};
pub use value_object::{ConnectionId, MessageText, RoomId, SignalPayload, Timestamp};
