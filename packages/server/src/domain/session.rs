//! 接続ごとのセッション状態遷移
//!
//! ```text
//! Connected ──join──▶ Joined(room) ──close──▶ Closed
//!     │                                        ▲
//!     └──────────────────close─────────────────┘
//! ```
//!
//! セッションがルームに参加できるのは一度だけ。受信したイベントは、
//! ルームに触れる前に現在の状態と照合する。

use super::{
    error::SessionError,
    value_object::{ConnectionId, RoomId},
};

/// セッションの状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// 接続済み、ルーム未参加
    Connected,
    /// 1 つのルームに参加中
    Joined(RoomId),
    /// 終了（以降の遷移なし）
    Closed,
}

/// クライアント 1 接続分のセッション
#[derive(Debug, Clone)]
pub struct Session {
    id: ConnectionId,
    state: SessionState,
}

impl Session {
    /// `Connected` 状態のセッションを作成
    pub fn new(id: ConnectionId) -> Self {
        Self {
            id,
            state: SessionState::Connected,
        }
    }

    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// 参加中のルーム
    pub fn bound_room(&self) -> Option<&RoomId> {
        match &self.state {
            SessionState::Joined(room_id) => Some(room_id),
            _ => None,
        }
    }

    /// 今 join を処理してよいか
    pub fn ensure_can_join(&self) -> Result<(), SessionError> {
        match &self.state {
            SessionState::Connected => Ok(()),
            SessionState::Joined(room_id) => {
                Err(SessionError::AlreadyJoined(room_id.as_str().to_string()))
            }
            SessionState::Closed => Err(SessionError::Closed),
        }
    }

    /// `Connected -> Joined(room_id)` に遷移
    pub fn bind(&mut self, room_id: RoomId) -> Result<(), SessionError> {
        self.ensure_can_join()?;
        self.state = SessionState::Joined(room_id);
        Ok(())
    }

    /// `room_id` 宛てのイベントを処理してよいか確認
    pub fn ensure_bound_to(&self, room_id: &RoomId) -> Result<(), SessionError> {
        match &self.state {
            SessionState::Joined(bound) if bound == room_id => Ok(()),
            SessionState::Joined(bound) => Err(SessionError::RoomMismatch {
                bound: bound.as_str().to_string(),
                requested: room_id.as_str().to_string(),
            }),
            SessionState::Connected => Err(SessionError::NotJoined),
            SessionState::Closed => Err(SessionError::Closed),
        }
    }

    /// `Closed` に遷移
    ///
    /// 後片付けが必要なルームを返す。`Some` になるのは参加中のセッションを
    /// 初めて閉じたときだけ。
    pub fn close(&mut self) -> Option<RoomId> {
        match std::mem::replace(&mut self.state, SessionState::Closed) {
            SessionState::Joined(room_id) => Some(room_id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(ConnectionId::new("alice".to_string()).unwrap())
    }

    fn room_id(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    #[test]
    fn test_new_session_is_connected() {
        // テスト項目: 新しいセッションは Connected 状態で開始する
        // when (操作):
        let session = session();

        // then (期待する結果):
        assert_eq!(session.state(), &SessionState::Connected);
        assert_eq!(session.bound_room(), None);
    }

    #[test]
    fn test_bind_moves_to_joined() {
        // テスト項目: join すると Joined 状態になりルームに紐付く
        // given (前提条件):
        let mut session = session();

        // when (操作):
        let result = session.bind(room_id("123"));

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(session.state(), &SessionState::Joined(room_id("123")));
    }

    #[test]
    fn test_second_bind_is_rejected_and_keeps_binding() {
        // テスト項目: 二度目の join は拒否され、最初の紐付けが保持される
        // given (前提条件):
        let mut session = session();
        session.bind(room_id("123")).unwrap();

        // when (操作):
        let result = session.bind(room_id("456"));

        // then (期待する結果):
        assert_eq!(result, Err(SessionError::AlreadyJoined("123".to_string())));
        assert_eq!(session.bound_room(), Some(&room_id("123")));
    }

    #[test]
    fn test_ensure_bound_to_rejects_other_room() {
        // テスト項目: 紐付いていないルーム宛てのイベントは拒否される
        // given (前提条件):
        let mut session = session();
        session.bind(room_id("123")).unwrap();

        // when (操作):
        let same = session.ensure_bound_to(&room_id("123"));
        let other = session.ensure_bound_to(&room_id("456"));

        // then (期待する結果):
        assert!(same.is_ok());
        assert_eq!(
            other,
            Err(SessionError::RoomMismatch {
                bound: "123".to_string(),
                requested: "456".to_string(),
            })
        );
    }

    #[test]
    fn test_ensure_bound_to_before_join() {
        // テスト項目: join 前のイベントは NotJoined で拒否される
        // when (操作):
        let result = session().ensure_bound_to(&room_id("123"));

        // then (期待する結果):
        assert_eq!(result, Err(SessionError::NotJoined));
    }

    #[test]
    fn test_close_joined_session_returns_room_once() {
        // テスト項目: Joined から close すると一度だけルームが返される
        // given (前提条件):
        let mut session = session();
        session.bind(room_id("123")).unwrap();

        // when (操作):
        let first = session.close();
        let second = session.close();

        // then (期待する結果):
        assert_eq!(first, Some(room_id("123")));
        assert_eq!(second, None);
        assert_eq!(session.state(), &SessionState::Closed);
    }

    #[test]
    fn test_close_connected_session_returns_none() {
        // テスト項目: join 前に close しても片付け対象のルームはない
        // given (前提条件):
        let mut session = session();

        // when (操作):
        let room = session.close();

        // then (期待する結果):
        assert_eq!(room, None);
        assert_eq!(session.ensure_can_join(), Err(SessionError::Closed));
    }
}
