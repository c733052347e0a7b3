//! UseCase: ルームからの退出（切断時）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveRoomUseCase::execute() メソッド
//! - 残りメンバーへの通知と、空になったルームの削除
//!
//! ### どのような状況を想定しているか
//! - 正常系：メンバーの退出と通知
//! - エッジケース：最後のメンバーの退出（ルームと履歴の破棄）
//! - 異常系：存在しないルーム、メンバーでない接続

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, Notification, RoomId, RoomRepository};

use super::error::LeaveRoomError;

/// 退出結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaveOutcome {
    /// 退出後に残っているメンバー数
    pub remaining: usize,
    /// ルームが空になりレジストリから削除されたか
    pub room_released: bool,
}

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    /// Repository（ルームレジストリの抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl LeaveRoomUseCase {
    /// 新しい LeaveRoomUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 退出を実行
    ///
    /// メンバーから外し、残りのメンバーに `user-disconnected` と `user-count` を送る。
    /// 誰もいなくなったルームは同じロックの中でレジストリから削除する。
    pub async fn execute(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Result<LeaveOutcome, LeaveRoomError> {
        let mut room = self
            .repository
            .lock(room_id)
            .await
            .ok_or_else(|| LeaveRoomError::RoomNotFound(room_id.as_str().to_string()))?;
        if !room.remove_member(connection_id) {
            return Err(LeaveRoomError::NotMember(
                connection_id.as_str().to_string(),
            ));
        }
        let remaining = room.member_count();
        tracing::info!(
            "Connection '{}' left room '{}' ({} members remaining)",
            connection_id,
            room_id,
            remaining
        );

        let targets = room.member_ids();
        let disconnected = Notification::PeerDisconnected {
            peer_id: connection_id.clone(),
        };
        if let Err(e) = self
            .message_pusher
            .broadcast(targets.clone(), &disconnected)
            .await
        {
            tracing::warn!("Failed to broadcast user-disconnected: {}", e);
        }
        if let Err(e) = self
            .message_pusher
            .broadcast(targets, &Notification::MemberCount { count: remaining })
            .await
        {
            tracing::warn!("Failed to broadcast user-count: {}", e);
        }

        let room_released = self.repository.release_if_empty(room).await;

        Ok(LeaveOutcome {
            remaining,
            room_released,
        })
    }
}
