//! UseCase: チャット（投稿と履歴の再送）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ChatUseCase::post_message(): 履歴への追加と送信者を含む全員への配信
//! - ChatUseCase::replay_history(): join 直後の履歴送信
//!
//! ### どのような状況を想定しているか
//! - 正常系：メンバーの投稿が全員に届く
//! - 異常系：存在しないルーム、メンバーでない接続からの投稿
//! - エッジケース：時計の巻き戻り

use std::sync::Arc;

use meetroom_shared::time::Clock;

use crate::domain::{
    ChatMessage, ConnectionId, MessagePusher, MessageText, Notification, Room, RoomId,
    RoomRepository, Timestamp,
};

use super::error::PostMessageError;

/// チャットのユースケース
pub struct ChatUseCase {
    /// Repository（ルームレジストリの抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// メッセージのタイムスタンプ取得元
    clock: Arc<dyn Clock>,
}

impl ChatUseCase {
    /// 新しい ChatUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    /// メッセージを投稿する
    ///
    /// 履歴に追加したうえで、送信者を含むルームの全メンバーに配信する。
    /// タイムスタンプはサーバー側で付与する。
    ///
    /// # Returns
    ///
    /// * `Ok(ChatMessage)` - 履歴に追加されたメッセージ
    /// * `Err(PostMessageError)` - ルームが存在しない、または送信者がメンバーでない
    pub async fn post_message(
        &self,
        room_id: &RoomId,
        sender: &ConnectionId,
        text: MessageText,
    ) -> Result<ChatMessage, PostMessageError> {
        let mut room = self
            .repository
            .lock(room_id)
            .await
            .ok_or_else(|| PostMessageError::RoomNotFound(room_id.as_str().to_string()))?;
        if !room.has_member(sender) {
            return Err(PostMessageError::NotMember(sender.as_str().to_string()));
        }

        let message = room.post_message(text, Timestamp::new(self.clock.now_millis()));
        tracing::debug!(
            "Message from '{}' appended to room '{}' (history: {})",
            sender,
            room_id,
            room.message_count()
        );

        let notification = Notification::ChatPosted {
            message: message.clone(),
        };
        if let Err(e) = self
            .message_pusher
            .broadcast(room.member_ids(), &notification)
            .await
        {
            tracing::warn!("Failed to broadcast message in room '{}': {}", room_id, e);
        }

        Ok(message)
    }

    /// ルームの現在の履歴を `to` に送る
    ///
    /// join 処理の中で、ルームのロックを保持したまま一度だけ呼ばれる。
    pub async fn replay_history(&self, room: &Room, to: &ConnectionId) {
        let notification = Notification::ChatHistory {
            messages: room.history(),
        };
        if let Err(e) = self.message_pusher.push_to(to, &notification).await {
            tracing::warn!("Failed to send chat history to '{}': {}", to, e);
        }
    }
}
