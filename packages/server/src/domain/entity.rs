//! エンティティ定義（ルームとチャット履歴）

use std::collections::{HashSet, VecDeque};

use super::value_object::{ConnectionId, MessageText, RoomId, Timestamp};

/// チャット履歴の 1 件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub text: MessageText,
    pub timestamp: Timestamp,
}

impl ChatMessage {
    pub fn new(text: MessageText, timestamp: Timestamp) -> Self {
        Self { text, timestamp }
    }
}

/// Room エンティティ（現在のメンバーと時系列順のチャット履歴）
///
/// ルームはメンバーがいる間だけ存在する。レジストリから外されたインスタンスは
/// closed になり、まだハンドルを持っている呼び出し側はレジストリから取り直す。
#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    pub created_at: Timestamp,
    members: HashSet<ConnectionId>,
    messages: VecDeque<ChatMessage>,
    /// 履歴の上限（`None` は無制限）
    history_limit: Option<usize>,
    closed: bool,
}

impl Room {
    /// 履歴無制限の空のルームを作成
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self::with_history_limit(id, created_at, None)
    }

    /// 履歴を最大 `history_limit` 件保持する空のルームを作成
    pub fn with_history_limit(
        id: RoomId,
        created_at: Timestamp,
        history_limit: Option<usize>,
    ) -> Self {
        Self {
            id,
            created_at,
            members: HashSet::new(),
            messages: VecDeque::new(),
            history_limit,
            closed: false,
        }
    }

    /// メンバーを追加。すでに参加済みなら `false`
    pub fn add_member(&mut self, connection_id: ConnectionId) -> bool {
        self.members.insert(connection_id)
    }

    /// メンバーを削除。参加していなければ `false`
    pub fn remove_member(&mut self, connection_id: &ConnectionId) -> bool {
        self.members.remove(connection_id)
    }

    pub fn has_member(&self, connection_id: &ConnectionId) -> bool {
        self.members.contains(connection_id)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// 現在の全メンバー
    pub fn member_ids(&self) -> Vec<ConnectionId> {
        self.members.iter().cloned().collect()
    }

    /// `exclude` を除く現在の全メンバー
    pub fn other_members(&self, exclude: &ConnectionId) -> Vec<ConnectionId> {
        self.members
            .iter()
            .filter(|id| *id != exclude)
            .cloned()
            .collect()
    }

    /// `now` を付けてメッセージを追加
    ///
    /// ルーム内のタイムスタンプは減少しない。時計が戻って `now` が直前の
    /// メッセージより古い場合は、直前のタイムスタンプを使う。
    pub fn post_message(&mut self, text: MessageText, now: Timestamp) -> ChatMessage {
        let timestamp = match self.last_timestamp() {
            Some(last) if last > now => last,
            _ => now,
        };
        let message = ChatMessage::new(text, timestamp);

        self.messages.push_back(message.clone());
        if let Some(limit) = self.history_limit {
            while self.messages.len() > limit {
                self.messages.pop_front();
            }
        }

        message
    }

    /// チャット履歴のスナップショット（古い順）
    pub fn history(&self) -> Vec<ChatMessage> {
        self.messages.iter().cloned().collect()
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    fn last_timestamp(&self) -> Option<Timestamp> {
        self.messages.back().map(|m| m.timestamp)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// レジストリから外されたことを記録
    pub fn close(&mut self) {
        self.closed = true;
    }
}
