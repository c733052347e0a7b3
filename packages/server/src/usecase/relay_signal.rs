//! UseCase: シグナリングの中継（offer / answer / candidate）
//!
//! クライアントは宛先 ID を付けて送ってくるが、ルーティングには使わない。
//! 送信者以外のルームメンバー全員に中継し、受信側は `fromPeerId` で相手を知る。
//! ペイロードは解釈も保存もしない。

use std::sync::Arc;

use crate::domain::{
    ConnectionId, MessagePusher, Notification, RoomId, RoomRepository, SignalKind,
    SignalPayload,
};

use super::error::RelaySignalError;

/// シグナリング中継のユースケース
pub struct RelaySignalUseCase {
    /// Repository（ルームレジストリの抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl RelaySignalUseCase {
    /// 新しい RelaySignalUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// `offer` を中継
    pub async fn relay_offer(
        &self,
        room_id: &RoomId,
        sender: &ConnectionId,
        payload: SignalPayload,
    ) -> Result<Vec<ConnectionId>, RelaySignalError> {
        self.execute(room_id, sender, SignalKind::Offer, payload).await
    }

    /// `answer` を中継
    pub async fn relay_answer(
        &self,
        room_id: &RoomId,
        sender: &ConnectionId,
        payload: SignalPayload,
    ) -> Result<Vec<ConnectionId>, RelaySignalError> {
        self.execute(room_id, sender, SignalKind::Answer, payload).await
    }

    /// `candidate` を中継
    pub async fn relay_candidate(
        &self,
        room_id: &RoomId,
        sender: &ConnectionId,
        payload: SignalPayload,
    ) -> Result<Vec<ConnectionId>, RelaySignalError> {
        self.execute(room_id, sender, SignalKind::Candidate, payload)
            .await
    }

    /// シグナリングを中継
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ConnectionId>)` - 中継先（送信者以外の全メンバー）
    /// * `Err(RelaySignalError)` - ルームが存在しない、または送信者がメンバーでない
    pub async fn execute(
        &self,
        room_id: &RoomId,
        sender: &ConnectionId,
        kind: SignalKind,
        payload: SignalPayload,
    ) -> Result<Vec<ConnectionId>, RelaySignalError> {
        let room = self
            .repository
            .lock(room_id)
            .await
            .ok_or_else(|| RelaySignalError::RoomNotFound(room_id.as_str().to_string()))?;
        if !room.has_member(sender) {
            return Err(RelaySignalError::NotMember(sender.as_str().to_string()));
        }

        let targets = room.other_members(sender);
        tracing::debug!(
            "Relaying {} from '{}' to {} peer(s) in room '{}'",
            kind.as_str(),
            sender,
            targets.len(),
            room_id
        );

        let notification = Notification::Signal {
            kind,
            from: sender.clone(),
            payload,
        };
        if let Err(e) = self
            .message_pusher
            .broadcast(targets.clone(), &notification)
            .await
        {
            tracing::warn!("Failed to relay {}: {}", kind.as_str(), e);
        }

        Ok(targets)
    }
}
