//! UseCase: ルームへの参加
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - ルームの作成、メンバー追加、通知の順序
//!
//! ### なぜこのテストが必要か
//! - 参加時の通知順（user-connected → chat-history → user-count）はクライアントの前提
//! - 後から参加した人が履歴を取りこぼさないことを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規ルームへの参加、既存ルームへの参加
//! - 異常系：同じ接続の二重参加
//! - エッジケース：同時参加

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, Notification, RoomId, RoomRepository};

use super::{chat::ChatUseCase, error::JoinRoomError};

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    /// Repository（ルームレジストリの抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// 履歴の再送に使う
    chat: Arc<ChatUseCase>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        chat: Arc<ChatUseCase>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            chat,
        }
    }

    /// ルームへの参加を実行
    ///
    /// ルームがなければ作成し、`connection_id` をメンバーに加える。
    /// ルームのロックを保持したまま次の順で通知する:
    ///
    /// 1. 他のメンバーへ `user-connected`
    /// 2. 参加者本人へ `chat-history`
    /// 3. 本人を含む全員へ `user-count`
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - 参加後のメンバー数
    /// * `Err(JoinRoomError)` - すでにメンバーである
    pub async fn execute(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Result<usize, JoinRoomError> {
        let mut room = self.repository.lock_or_create(room_id).await;
        if !room.add_member(connection_id.clone()) {
            return Err(JoinRoomError::AlreadyMember(
                connection_id.as_str().to_string(),
            ));
        }
        let count = room.member_count();
        tracing::info!(
            "Connection '{}' joined room '{}' ({} members)",
            connection_id,
            room_id,
            count
        );

        // 1. user-connected
        let connected = Notification::PeerConnected {
            peer_id: connection_id.clone(),
        };
        if let Err(e) = self
            .message_pusher
            .broadcast(room.other_members(connection_id), &connected)
            .await
        {
            tracing::warn!("Failed to broadcast user-connected: {}", e);
        }

        // 2. chat-history
        self.chat.replay_history(&room, connection_id).await;

        // 3. user-count
        if let Err(e) = self
            .message_pusher
            .broadcast(room.member_ids(), &Notification::MemberCount { count })
            .await
        {
            tracing::warn!("Failed to broadcast user-count: {}", e);
        }

        Ok(count)
    }
}
