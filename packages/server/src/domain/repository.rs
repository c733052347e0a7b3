//! Repository trait 定義
//!
//! ドメイン層が必要とするルームレジストリのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use tokio::sync::OwnedMutexGuard;

use super::{entity::Room, value_object::RoomId};

/// 1 つのルームへの排他アクセス
///
/// ルームの変更と、それに伴うブロードキャストは、このガードを保持したまま行う。
/// これでルームごとの処理が直列化され、メンバーが受け取るイベントの順序が一意に決まる。
pub type RoomGuard = OwnedMutexGuard<Room>;

/// Room Repository trait（プロセス全体のルームレジストリ）
///
/// メンバーが 1 人以上いるルームだけが登録されている。
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// ルームをロックする。存在しなければ空のルームを作成してからロックする
    ///
    /// 同じ ID への同時呼び出しは同じルームに行き着く。解放済みのルームは返さない。
    async fn lock_or_create(&self, room_id: &RoomId) -> RoomGuard;

    /// 既存のルームをロック
    async fn lock(&self, room_id: &RoomId) -> Option<RoomGuard>;

    /// メンバーがいなければルームをレジストリから削除
    ///
    /// ガードを受け取るので、空かどうかの確認と削除の間に join が割り込めない。
    /// 削除した場合は `true` を返す。
    async fn release_if_empty(&self, room: RoomGuard) -> bool;

    /// ルームのスナップショットを取得
    async fn find_room(&self, room_id: &RoomId) -> Option<Room>;

    /// 全ルームのスナップショットを ID 順で取得
    async fn list_rooms(&self) -> Vec<Room>;
}
