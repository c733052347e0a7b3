//! クライアントへの通知（ワイヤーフォーマットには依存しない）

use super::{
    entity::ChatMessage,
    value_object::{ConnectionId, SignalPayload},
};

/// シグナリングの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    Offer,
    Answer,
    Candidate,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::Offer => "offer",
            SignalKind::Answer => "answer",
            SignalKind::Candidate => "candidate",
        }
    }
}

/// サーバーからクライアントへの通知
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// 接続直後に一度だけ送る自分の接続 ID
    Welcome { peer_id: ConnectionId },
    /// 他のピアがルームに参加した
    PeerConnected { peer_id: ConnectionId },
    /// ピアがルームから退出した
    PeerDisconnected { peer_id: ConnectionId },
    /// ルームの現在のメンバー数
    MemberCount { count: usize },
    /// 参加直後のピアに一度だけ送る全チャット履歴
    ChatHistory { messages: Vec<ChatMessage> },
    /// ルームに投稿されたメッセージ
    ChatPosted { message: ChatMessage },
    /// 中継するシグナリング
    Signal {
        kind: SignalKind,
        from: ConnectionId,
        payload: SignalPayload,
    },
}
