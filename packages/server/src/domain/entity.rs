//! エンティティ
//!
//! - `Connection`: `join` を完了した 1 本の接続
//! - `Room`: 2 人の対戦者と 1 つの問題からなる対戦セッション

use super::{
    error::RoomError,
    value_object::{ConnectionId, ProblemId, RoomId, Timestamp, UserId},
};

/// `join` を完了した接続
///
/// ユーザー ID は最初の `join` で一度だけ設定され、以後その接続の間は変わりません。
/// 所属ルームは `RoomStore` 側が管理し、接続自身はルームを保持しません。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: ConnectionId,
    pub user_id: UserId,
    pub joined_at: Timestamp,
}

impl Connection {
    pub fn new(id: ConnectionId, user_id: UserId, joined_at: Timestamp) -> Self {
        Self {
            id,
            user_id,
            joined_at,
        }
    }
}

/// ルームの状態
///
/// `Closed` になったルームは `RoomStore` から取り除かれるため、
/// ストアの中に `Closed` のルームが残ることはありません。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomStatus {
    Active,
    Closed,
}

/// 対戦ルーム
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: RoomId,
    /// 占有者（ちょうど 2 人、順序は表示用）
    pub occupants: [Connection; 2],
    pub problem_id: ProblemId,
    pub status: RoomStatus,
    pub created_at: Timestamp,
}

impl Room {
    /// 新しい Room を作成
    ///
    /// 2 人の占有者は接続もユーザーも異なっていなければなりません。
    pub fn new(
        id: RoomId,
        first: Connection,
        second: Connection,
        problem_id: ProblemId,
        created_at: Timestamp,
    ) -> Result<Self, RoomError> {
        if first.id == second.id || first.user_id == second.user_id {
            return Err(RoomError::SameOccupant(first.user_id.into_string()));
        }

        Ok(Self {
            id,
            occupants: [first, second],
            problem_id,
            status: RoomStatus::Active,
            created_at,
        })
    }

    /// 接続がこのルームの占有者かどうか
    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.occupants.iter().any(|c| &c.id == connection_id)
    }

    /// 指定した接続の対戦相手を取得
    ///
    /// 接続が占有者でない場合は `None` を返します。
    pub fn opponent_of(&self, connection_id: &ConnectionId) -> Option<&Connection> {
        match &self.occupants {
            [first, second] if &first.id == connection_id => Some(second),
            [first, second] if &second.id == connection_id => Some(first),
            _ => None,
        }
    }

    pub fn occupant_ids(&self) -> [ConnectionId; 2] {
        [self.occupants[0].id, self.occupants[1].id]
    }

    pub fn is_active(&self) -> bool {
        self.status == RoomStatus::Active
    }

    /// ルームを終了状態にする
    pub fn close(&mut self) {
        self.status = RoomStatus::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connection(name: &str) -> Connection {
        Connection::new(
            ConnectionId::generate(),
            UserId::new(name.to_string()).unwrap(),
            Timestamp::new(1000),
        )
    }

    fn room_id() -> RoomId {
        RoomId::new("room-1".to_string()).unwrap()
    }

    #[test]
    fn test_room_new_is_active() {
        // テスト項目: 作成直後のルームは Active で 2 人の占有者を持つ
        // given (前提条件):
        let alice = connection("alice");
        let bob = connection("bob");

        // when (操作):
        let room = Room::new(
            room_id(),
            alice.clone(),
            bob.clone(),
            ProblemId::new(7),
            Timestamp::new(2000),
        )
        .unwrap();

        // then (期待する結果):
        assert!(room.is_active());
        assert_eq!(room.occupants, [alice, bob]);
        assert_eq!(room.problem_id, ProblemId::new(7));
    }

    #[test]
    fn test_room_rejects_same_user() {
        // テスト項目: 同じユーザー同士のルームは作成できない
        // given (前提条件):
        let first = connection("alice");
        let second = connection("alice");

        // when (操作):
        let result = Room::new(
            room_id(),
            first,
            second,
            ProblemId::new(1),
            Timestamp::new(0),
        );

        // then (期待する結果):
        assert_eq!(result, Err(RoomError::SameOccupant("alice".to_string())));
    }

    #[test]
    fn test_room_rejects_same_connection() {
        // テスト項目: 同じ接続同士のルームは作成できない
        let alice = connection("alice");
        let result = Room::new(
            room_id(),
            alice.clone(),
            alice,
            ProblemId::new(1),
            Timestamp::new(0),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_opponent_of() {
        // テスト項目: 占有者から見た対戦相手が取得でき、部外者は None になる
        // given (前提条件):
        let alice = connection("alice");
        let bob = connection("bob");
        let outsider = connection("charlie");
        let room = Room::new(
            room_id(),
            alice.clone(),
            bob.clone(),
            ProblemId::new(1),
            Timestamp::new(0),
        )
        .unwrap();

        // when (操作) / then (期待する結果):
        assert_eq!(room.opponent_of(&alice.id), Some(&bob));
        assert_eq!(room.opponent_of(&bob.id), Some(&alice));
        assert_eq!(room.opponent_of(&outsider.id), None);
        assert!(room.contains(&alice.id));
        assert!(!room.contains(&outsider.id));
    }

    #[test]
    fn test_close_marks_room_closed() {
        // テスト項目: close でルームが Closed になる
        let mut room = Room::new(
            room_id(),
            connection("alice"),
            connection("bob"),
            ProblemId::new(1),
            Timestamp::new(0),
        )
        .unwrap();

        room.close();

        assert_eq!(room.status, RoomStatus::Closed);
        assert!(!room.is_active());
    }
}
