//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! プロセス内の HashMap をルームレジストリとして使用します。
//!
//! ## ロック順序
//!
//! - レジストリのロックは HashMap 操作の間だけ保持し、ルームのロック待ちの間は保持しない
//! - ルームのロックを保持したままレジストリをロックしてよい（解放処理）
//!
//! 解放されたルームには `closed` フラグが立つ。そのルームのロックを待っていた join は
//! フラグを見てレジストリから取り直すため、削除済みのルームに参加者が入ることはない。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use meetroom_shared::time::{Clock, SystemClock};

use crate::domain::{Room, RoomGuard, RoomId, RoomRepository, Timestamp};

/// インメモリ Room Repository 実装
pub struct InMemoryRoomRepository {
    /// room_id → Room
    rooms: Mutex<HashMap<RoomId, Arc<Mutex<Room>>>>,
    /// 新規ルームの履歴上限（`None` は無制限）
    history_limit: Option<usize>,
    /// ルーム作成時刻の取得元
    clock: Arc<dyn Clock>,
}

impl InMemoryRoomRepository {
    /// 履歴無制限・システム時計の InMemoryRoomRepository を作成
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            history_limit: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// 新規ルームの履歴上限を設定
    pub fn with_history_limit(mut self, history_limit: Option<usize>) -> Self {
        self.history_limit = history_limit;
        self
    }

    /// 時計を差し替える（テスト用）
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    async fn handle(&self, room_id: &RoomId) -> Option<Arc<Mutex<Room>>> {
        let rooms = self.rooms.lock().await;
        rooms.get(room_id).cloned()
    }

    async fn handles(&self) -> Vec<Arc<Mutex<Room>>> {
        let rooms = self.rooms.lock().await;
        rooms.values().cloned().collect()
    }
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn lock_or_create(&self, room_id: &RoomId) -> RoomGuard {
        loop {
            let handle = {
                let mut rooms = self.rooms.lock().await;
                rooms
                    .entry(room_id.clone())
                    .or_insert_with(|| {
                        tracing::info!("Room '{}' created", room_id);
                        Arc::new(Mutex::new(Room::with_history_limit(
                            room_id.clone(),
                            Timestamp::new(self.clock.now_millis()),
                            self.history_limit,
                        )))
                    })
                    .clone()
            };

            let guard = handle.lock_owned().await;
            if !guard.is_closed() {
                return guard;
            }
            tracing::debug!("Room '{}' was released while waiting, retrying", room_id);
        }
    }

    async fn lock(&self, room_id: &RoomId) -> Option<RoomGuard> {
        let handle = self.handle(room_id).await?;
        let guard = handle.lock_owned().await;
        (!guard.is_closed()).then_some(guard)
    }

    async fn release_if_empty(&self, mut room: RoomGuard) -> bool {
        if !room.is_empty() {
            return false;
        }
        room.close();

        let handle = OwnedMutexGuard::mutex(&room).clone();
        let mut rooms = self.rooms.lock().await;
        let registered = rooms
            .get(&room.id)
            .is_some_and(|current| Arc::ptr_eq(current, &handle));
        if registered {
            rooms.remove(&room.id);
            tracing::info!("Room '{}' is empty and has been removed", room.id);
        }
        registered
    }

    async fn find_room(&self, room_id: &RoomId) -> Option<Room> {
        let guard = self.lock(room_id).await?;
        Some((*guard).clone())
    }

    async fn list_rooms(&self) -> Vec<Room> {
        let mut rooms = Vec::new();
        for handle in self.handles().await {
            let room = handle.lock().await;
            if !room.is_closed() {
                rooms.push((*room).clone());
            }
        }
        rooms.sort_by(|a, b| a.id.cmp(&b.id));
        rooms
    }
}
