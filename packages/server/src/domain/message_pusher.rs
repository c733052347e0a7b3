//! MessagePusher trait 定義

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{
    error::MessagePushError, notification::Notification, value_object::ConnectionId,
};

/// 1 接続分の送信フレームを流すチャンネル
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// 接続中のクライアントへ通知を届ける
///
/// 送信はブロックしない。接続ごとのチャンネルに積むだけ。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続の送信チャンネルを登録
    async fn register_client(&self, client_id: ConnectionId, sender: PusherChannel);

    /// 接続の送信チャンネルを登録解除
    async fn unregister_client(&self, client_id: &ConnectionId);

    /// 特定のクライアントに送信
    async fn push_to(
        &self,
        client_id: &ConnectionId,
        notification: &Notification,
    ) -> Result<(), MessagePushError>;

    /// 全ての宛先に送信
    ///
    /// 一部の宛先への送信失敗はログに残して読み飛ばし、残りの宛先には届ける。
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        notification: &Notification,
    ) -> Result<(), MessagePushError>;
}
