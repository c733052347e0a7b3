//! 接続ごとのイベント振り分け
//!
//! WebSocket 接続はそれぞれ 1 つの [`Session`] を持つ。受信フレームは全て
//! [`ConnectionManager::handle_text`] を通り、セッションの状態と照合してから
//! UseCase を 1 つだけ呼ぶ。状態に合わないイベントはログに残して破棄する。
//! クライアントが何を送っても、接続やプロセスは落ちない。

use std::sync::Arc;

use crate::{
    domain::{
        ConnectionIdFactory, MessagePusher, MessageText, Notification, PusherChannel, RoomId,
        Session, SignalKind, SignalPayload, ValueObjectError,
    },
    infrastructure::dto::websocket::ClientMessage,
    usecase::{ChatUseCase, JoinRoomUseCase, LeaveRoomUseCase, RelaySignalUseCase},
};

/// 通信イベントをセッションの状態遷移と UseCase につなぐ
pub struct ConnectionManager {
    join_room_usecase: Arc<JoinRoomUseCase>,
    leave_room_usecase: Arc<LeaveRoomUseCase>,
    chat_usecase: Arc<ChatUseCase>,
    relay_signal_usecase: Arc<RelaySignalUseCase>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectionManager {
    pub fn new(
        join_room_usecase: Arc<JoinRoomUseCase>,
        leave_room_usecase: Arc<LeaveRoomUseCase>,
        chat_usecase: Arc<ChatUseCase>,
        relay_signal_usecase: Arc<RelaySignalUseCase>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            join_room_usecase,
            leave_room_usecase,
            chat_usecase,
            relay_signal_usecase,
            message_pusher,
        }
    }

    /// 新しい接続を登録
    ///
    /// クライアントに自分の接続 ID を伝えたうえで、`Connected` 状態のセッションを返す。
    pub async fn open(&self, sender: PusherChannel) -> Result<Session, ValueObjectError> {
        let connection_id = ConnectionIdFactory::generate()?;
        self.message_pusher
            .register_client(connection_id.clone(), sender)
            .await;

        let welcome = Notification::Welcome {
            peer_id: connection_id.clone(),
        };
        if let Err(e) = self.message_pusher.push_to(&connection_id, &welcome).await {
            tracing::warn!("Failed to send welcome to '{}': {}", connection_id, e);
        }

        tracing::info!("Connection '{}' opened", connection_id);
        Ok(Session::new(connection_id))
    }

    /// テキストフレームを解釈して振り分ける
    pub async fn handle_text(&self, session: &mut Session, text: &str) {
        match serde_json::from_str::<ClientMessage>(text) {
            Ok(message) => self.dispatch(session, message).await,
            Err(e) => {
                tracing::warn!("Ignoring malformed frame from '{}': {}", session.id(), e);
            }
        }
    }

    /// 受信イベントの唯一の振り分け口
    pub async fn dispatch(&self, session: &mut Session, message: ClientMessage) {
        match message {
            ClientMessage::JoinRoom { room_id } => self.join(session, room_id).await,
            ClientMessage::Message { room_id, text } => self.post(session, room_id, text).await,
            ClientMessage::Offer {
                room_id,
                target_id,
                sdp,
            } => {
                self.relay(session, room_id, target_id, SignalKind::Offer, sdp)
                    .await
            }
            ClientMessage::Answer {
                room_id,
                target_id,
                sdp,
            } => {
                self.relay(session, room_id, target_id, SignalKind::Answer, sdp)
                    .await
            }
            ClientMessage::Candidate {
                room_id,
                target_id,
                candidate,
            } => {
                self.relay(session, room_id, target_id, SignalKind::Candidate, candidate)
                    .await
            }
        }
    }

    /// 切断時の処理。参加中のルームから退出し、接続を登録解除する
    pub async fn close(&self, session: &mut Session) {
        if let Some(room_id) = session.close() {
            match self.leave_room_usecase.execute(&room_id, session.id()).await {
                Ok(outcome) if outcome.room_released => {
                    tracing::info!("Room '{}' released after last member left", room_id);
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("Failed to leave room '{}' for '{}': {}", room_id, session.id(), e);
                }
            }
        }
        self.message_pusher.unregister_client(session.id()).await;
        tracing::info!("Connection '{}' closed", session.id());
    }

    async fn join(&self, session: &mut Session, room_id: String) {
        if let Err(e) = session.ensure_can_join() {
            tracing::debug!("Ignoring join-room from '{}': {}", session.id(), e);
            return;
        }
        let room_id = match RoomId::try_from(room_id) {
            Ok(room_id) => room_id,
            Err(e) => {
                tracing::warn!("Ignoring join-room from '{}': {}", session.id(), e);
                return;
            }
        };

        match self.join_room_usecase.execute(&room_id, session.id()).await {
            Ok(_) => {
                if let Err(e) = session.bind(room_id) {
                    tracing::warn!("Session '{}' could not be bound: {}", session.id(), e);
                }
            }
            Err(e) => {
                tracing::warn!("Failed to join room '{}': {}", room_id, e);
            }
        }
    }

    async fn post(&self, session: &Session, room_id: String, text: String) {
        let Some(room_id) = checked_room(session, room_id, "message") else {
            return;
        };
        if let Err(e) = self
            .chat_usecase
            .post_message(&room_id, session.id(), MessageText::new(text))
            .await
        {
            tracing::warn!("Failed to post message from '{}': {}", session.id(), e);
        }
    }

    async fn relay(
        &self,
        session: &Session,
        room_id: String,
        target_id: Option<String>,
        kind: SignalKind,
        payload: serde_json::Value,
    ) {
        let Some(room_id) = checked_room(session, room_id, kind.as_str()) else {
            return;
        };
        // targetId は参考情報。配信先はルーム全体
        tracing::debug!(
            "{} from '{}' (target: {})",
            kind.as_str(),
            session.id(),
            target_id.as_deref().unwrap_or("-")
        );

        let payload = SignalPayload::new(payload);
        let sender = session.id();
        let result = match kind {
            SignalKind::Offer => {
                self.relay_signal_usecase
                    .relay_offer(&room_id, sender, payload)
                    .await
            }
            SignalKind::Answer => {
                self.relay_signal_usecase
                    .relay_answer(&room_id, sender, payload)
                    .await
            }
            SignalKind::Candidate => {
                self.relay_signal_usecase
                    .relay_candidate(&room_id, sender, payload)
                    .await
            }
        };
        if let Err(e) = result {
            tracing::warn!("Failed to relay {} from '{}': {}", kind.as_str(), sender, e);
        }
    }
}

/// セッションが参加中のルームと一致すれば、そのルーム ID を返す
fn checked_room(session: &Session, room_id: String, event: &str) -> Option<RoomId> {
    let room_id = match RoomId::try_from(room_id) {
        Ok(room_id) => room_id,
        Err(e) => {
            tracing::warn!("Ignoring {} from '{}': {}", event, session.id(), e);
            return None;
        }
    };
    match session.ensure_bound_to(&room_id) {
        Ok(()) => Some(room_id),
        Err(e) => {
            tracing::warn!("Ignoring {} from '{}': {}", event, session.id(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{RoomRepository, SessionState},
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository,
        },
    };
    use meetroom_shared::time::FixedClock;
    use serde_json::{Value, json};
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - セッション状態に応じたイベントの振り分け
    // - 二重 join、別ルーム宛てのイベント、壊れたフレームが無視されること
    // - 切断時の後片付け
    // ========================================

    struct Fixture {
        repository: Arc<InMemoryRoomRepository>,
        clock: Arc<FixedClock>,
        manager: ConnectionManager,
    }

    fn fixture() -> Fixture {
        let repository = Arc::new(InMemoryRoomRepository::new());
        let pusher: Arc<dyn MessagePusher> = Arc::new(WebSocketMessagePusher::default());
        let clock = Arc::new(FixedClock::new(1000));
        let chat = Arc::new(ChatUseCase::new(
            repository.clone(),
            pusher.clone(),
            clock.clone(),
        ));
        let manager = ConnectionManager::new(
            Arc::new(JoinRoomUseCase::new(
                repository.clone(),
                pusher.clone(),
                chat.clone(),
            )),
            Arc::new(LeaveRoomUseCase::new(repository.clone(), pusher.clone())),
            chat,
            Arc::new(RelaySignalUseCase::new(repository.clone(), pusher.clone())),
            pusher,
        );
        Fixture {
            repository,
            clock,
            manager,
        }
    }

    struct Client {
        session: Session,
        rx: mpsc::UnboundedReceiver<String>,
    }

    impl Client {
        fn id(&self) -> String {
            self.session.id().as_str().to_string()
        }

        fn drain(&mut self) -> Vec<Value> {
            let mut frames = Vec::new();
            while let Ok(frame) = self.rx.try_recv() {
                frames.push(serde_json::from_str(&frame).unwrap());
            }
            frames
        }
    }

    async fn open(f: &Fixture) -> Client {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = f.manager.open(tx).await.unwrap();
        let mut client = Client { session, rx };
        let welcome = client.drain();
        assert_eq!(welcome, vec![json!({"type": "welcome", "peerId": client.id()})]);
        client
    }

    async fn send(f: &Fixture, client: &mut Client, frame: Value) {
        f.manager
            .handle_text(&mut client.session, &frame.to_string())
            .await;
    }

    fn room_id(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_join_binds_session() {
        // テスト項目: join-room でセッションがルームに紐付く
        // given (前提条件):
        let f = fixture();
        let mut alice = open(&f).await;

        // when (操作):
        send(&f, &mut alice, json!({"type": "join-room", "roomId": "123"})).await;

        // then (期待する結果):
        assert_eq!(alice.session.state(), &SessionState::Joined(room_id("123")));
        assert_eq!(
            alice.drain(),
            vec![
                json!({"type": "chat-history", "messages": []}),
                json!({"type": "user-count", "count": 1}),
            ]
        );
    }

    #[tokio::test]
    async fn test_second_join_is_ignored() {
        // テスト項目: 二度目の join-room は無視され、最初のルームに留まる
        // given (前提条件):
        let f = fixture();
        let mut alice = open(&f).await;
        send(&f, &mut alice, json!({"type": "join-room", "roomId": "123"})).await;
        alice.drain();

        // when (操作):
        send(&f, &mut alice, json!({"type": "join-room", "roomId": "123"})).await;
        send(&f, &mut alice, json!({"type": "join-room", "roomId": "456"})).await;

        // then (期待する結果):
        assert!(alice.drain().is_empty());
        assert_eq!(alice.session.bound_room(), Some(&room_id("123")));
        assert!(f.repository.find_room(&room_id("456")).await.is_none());
        let room = f.repository.find_room(&room_id("123")).await.unwrap();
        assert_eq!(room.member_count(), 1);
    }

    #[tokio::test]
    async fn test_events_before_join_are_ignored() {
        // テスト項目: join 前の message / offer は無視される
        // given (前提条件):
        let f = fixture();
        let mut alice = open(&f).await;
        let mut bob = open(&f).await;
        send(&f, &mut bob, json!({"type": "join-room", "roomId": "123"})).await;
        bob.drain();

        // when (操作):
        send(&f, &mut alice, json!({"type": "message", "roomId": "123", "text": "hi"})).await;
        send(
            &f,
            &mut alice,
            json!({"type": "offer", "roomId": "123", "targetId": bob.id(), "sdp": {}}),
        )
        .await;

        // then (期待する結果):
        assert!(bob.drain().is_empty());
        assert_eq!(alice.session.state(), &SessionState::Connected);
    }

    #[tokio::test]
    async fn test_events_for_other_room_are_ignored() {
        // テスト項目: 紐付いたルーム以外を指定したイベントは他のルームに漏れない
        // given (前提条件):
        let f = fixture();
        let mut alice = open(&f).await;
        let mut bob = open(&f).await;
        send(&f, &mut alice, json!({"type": "join-room", "roomId": "123"})).await;
        send(&f, &mut bob, json!({"type": "join-room", "roomId": "456"})).await;
        alice.drain();
        bob.drain();

        // when (操作):
        send(&f, &mut alice, json!({"type": "message", "roomId": "456", "text": "leak"})).await;
        send(
            &f,
            &mut alice,
            json!({"type": "candidate", "roomId": "456", "targetId": bob.id(), "candidate": {}}),
        )
        .await;

        // then (期待する結果):
        assert!(bob.drain().is_empty());
        assert!(alice.drain().is_empty());
        let room = f.repository.find_room(&room_id("456")).await.unwrap();
        assert_eq!(room.message_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_frames_are_ignored() {
        // テスト項目: 壊れたフレームや未知のイベントは無視され、状態は変わらない
        // given (前提条件):
        let f = fixture();
        let mut alice = open(&f).await;

        // when (操作):
        for frame in [
            "not json",
            "{}",
            r#"{"type":"join-room"}"#,
            r#"{"type":"join-room","roomId":42}"#,
            r#"{"type":"join-room","roomId":""}"#,
            r#"{"type":"dance","roomId":"123"}"#,
        ] {
            f.manager.handle_text(&mut alice.session, frame).await;
        }

        // then (期待する結果):
        assert_eq!(alice.session.state(), &SessionState::Connected);
        assert!(alice.drain().is_empty());
        assert!(f.repository.list_rooms().await.is_empty());
    }

    #[tokio::test]
    async fn test_close_before_join_has_no_side_effects() {
        // テスト項目: join 前の切断では何も通知されない
        // given (前提条件):
        let f = fixture();
        let mut alice = open(&f).await;
        let mut bob = open(&f).await;
        send(&f, &mut bob, json!({"type": "join-room", "roomId": "123"})).await;
        bob.drain();

        // when (操作):
        f.manager.close(&mut alice.session).await;

        // then (期待する結果):
        assert_eq!(alice.session.state(), &SessionState::Closed);
        assert!(bob.drain().is_empty());
    }

    #[tokio::test]
    async fn test_events_after_close_are_ignored() {
        // テスト項目: 切断後に届いたイベントは処理されない
        // given (前提条件):
        let f = fixture();
        let mut alice = open(&f).await;
        f.manager.close(&mut alice.session).await;

        // when (操作):
        send(&f, &mut alice, json!({"type": "join-room", "roomId": "123"})).await;

        // then (期待する結果):
        assert_eq!(alice.session.state(), &SessionState::Closed);
        assert!(f.repository.list_rooms().await.is_empty());
    }

    #[tokio::test]
    async fn test_room_scenario() {
        // テスト項目: A 参加 → 投稿 → B 参加 → 投稿 → A 切断 → B 切断 の一連の流れ
        // given (前提条件):
        let f = fixture();
        let mut a = open(&f).await;
        let mut b = open(&f).await;

        // when (操作) / then (期待する結果):
        send(&f, &mut a, json!({"type": "join-room", "roomId": "123"})).await;
        assert_eq!(a.drain()[0], json!({"type": "chat-history", "messages": []}));

        send(&f, &mut a, json!({"type": "message", "roomId": "123", "text": "hello"})).await;
        assert_eq!(
            a.drain(),
            vec![json!({"type": "message", "text": "hello", "timestamp": 1000})]
        );

        send(&f, &mut b, json!({"type": "join-room", "roomId": "123"})).await;
        assert_eq!(
            b.drain(),
            vec![
                json!({"type": "chat-history", "messages": [{"text": "hello", "timestamp": 1000}]}),
                json!({"type": "user-count", "count": 2}),
            ]
        );
        assert_eq!(
            a.drain(),
            vec![
                json!({"type": "user-connected", "peerId": b.id()}),
                json!({"type": "user-count", "count": 2}),
            ]
        );

        f.clock.set(2000);
        send(&f, &mut b, json!({"type": "message", "roomId": "123", "text": "hi"})).await;
        let expected = json!({"type": "message", "text": "hi", "timestamp": 2000});
        assert_eq!(a.drain(), vec![expected.clone()]);
        assert_eq!(b.drain(), vec![expected]);

        f.manager.close(&mut a.session).await;
        assert_eq!(
            b.drain(),
            vec![
                json!({"type": "user-disconnected", "peerId": a.id()}),
                json!({"type": "user-count", "count": 1}),
            ]
        );

        f.manager.close(&mut b.session).await;
        assert!(f.repository.find_room(&room_id("123")).await.is_none());
    }

    #[tokio::test]
    async fn test_rejoin_after_drain_starts_with_empty_history() {
        // テスト項目: 全員が抜けたルームに再参加すると履歴は空
        // given (前提条件):
        let f = fixture();
        let mut a = open(&f).await;
        send(&f, &mut a, json!({"type": "join-room", "roomId": "123"})).await;
        send(&f, &mut a, json!({"type": "message", "roomId": "123", "text": "old"})).await;
        f.manager.close(&mut a.session).await;

        // when (操作):
        let mut b = open(&f).await;
        send(&f, &mut b, json!({"type": "join-room", "roomId": "123"})).await;

        // then (期待する結果):
        assert_eq!(b.drain()[0], json!({"type": "chat-history", "messages": []}));
    }

    #[tokio::test]
    async fn test_signaling_fans_out_and_ignores_target() {
        // テスト項目: シグナリングは宛先に関係なく送信者以外の全員に届く
        // given (前提条件):
        let f = fixture();
        let mut a = open(&f).await;
        let mut b = open(&f).await;
        let mut c = open(&f).await;
        for client in [&mut a, &mut b, &mut c] {
            send(&f, client, json!({"type": "join-room", "roomId": "123"})).await;
        }
        a.drain();
        b.drain();
        c.drain();

        // when (操作): 宛先は b だが c にも届く
        send(
            &f,
            &mut a,
            json!({"type": "offer", "roomId": "123", "targetId": b.id(), "sdp": {"type": "offer"}}),
        )
        .await;

        // then (期待する結果):
        let expected = json!({"type": "offer", "fromPeerId": a.id(), "sdp": {"type": "offer"}});
        assert_eq!(b.drain(), vec![expected.clone()]);
        assert_eq!(c.drain(), vec![expected]);
        assert!(a.drain().is_empty());
    }
}
