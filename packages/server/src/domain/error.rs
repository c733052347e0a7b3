//! ドメイン層のエラー型

use thiserror::Error;

/// 値オブジェクト生成時のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    /// ルーム ID が空
    #[error("room id must not be empty")]
    EmptyRoomId,

    /// 接続 ID が空
    #[error("connection id must not be empty")]
    EmptyConnectionId,
}

/// セッション状態遷移のエラー
///
/// クライアントには返さない。接続ハンドラがログに残し、該当イベントを破棄する。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// すでにルームに参加済み
    #[error("session is already joined to room '{0}'")]
    AlreadyJoined(String),

    /// まだどのルームにも参加していない
    #[error("session has not joined a room")]
    NotJoined,

    /// 参加中のルームとは別のルームを指定した
    #[error("event targets room '{requested}' but session is bound to '{bound}'")]
    RoomMismatch { bound: String, requested: String },

    /// セッションは終了済み
    #[error("session is closed")]
    Closed,
}

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// クライアントの送信チャンネルが登録されていない
    #[error("client '{0}' is not registered")]
    ClientNotFound(String),

    /// 送信チャンネルが閉じている、またはエンコードに失敗した
    #[error("failed to push message: {0}")]
    PushFailed(String),
}
