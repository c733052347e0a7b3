//! ID の生成

use rand::Rng;
use uuid::Uuid;

use super::{
    error::ValueObjectError,
    value_object::{ConnectionId, RoomId},
};

/// 生成するルーム番号の最小値
pub const ROOM_NUMBER_MIN: u16 = 100;
/// 生成するルーム番号の最大値
pub const ROOM_NUMBER_MAX: u16 = 999;

/// 共有しやすい短いルーム ID を生成
///
/// ID は 3 桁の数字。既存のルームと重なることもあり、その場合はそのルームに参加する。
pub struct RoomIdFactory;

impl RoomIdFactory {
    pub fn generate() -> Result<RoomId, ValueObjectError> {
        let number = rand::thread_rng().gen_range(ROOM_NUMBER_MIN..=ROOM_NUMBER_MAX);
        RoomId::new(number.to_string())
    }
}

/// 接続 ID（UUID v4）を生成
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    pub fn generate() -> Result<ConnectionId, ValueObjectError> {
        ConnectionId::new(Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_id_is_three_digit_number() {
        // テスト項目: 生成された RoomId は 100〜999 の数値
        for _ in 0..200 {
            // when (操作):
            let room_id = RoomIdFactory::generate().unwrap();

            // then (期待する結果):
            let number: u16 = room_id.as_str().parse().unwrap();
            assert!((ROOM_NUMBER_MIN..=ROOM_NUMBER_MAX).contains(&number));
        }
    }

    #[test]
    fn test_connection_ids_are_unique() {
        // テスト項目: ConnectionId は毎回異なる値が生成される
        // when (操作):
        let first = ConnectionIdFactory::generate().unwrap();
        let second = ConnectionIdFactory::generate().unwrap();

        // then (期待する結果):
        assert_ne!(first, second);
        assert!(Uuid::parse_str(first.as_str()).is_ok());
    }
}
