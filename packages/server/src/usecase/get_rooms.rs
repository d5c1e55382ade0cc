//! UseCase: ルーム一覧の取得

use std::sync::Arc;

use crate::domain::{Room, RoomStore};

/// 対戦中のルーム一覧を取得するユースケース
pub struct GetRoomsUseCase {
    rooms: Arc<dyn RoomStore>,
}

impl GetRoomsUseCase {
    pub fn new(rooms: Arc<dyn RoomStore>) -> Self {
        Self { rooms }
    }

    /// 作成日時順のルーム一覧
    pub async fn execute(&self) -> Vec<Room> {
        self.rooms.list().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::testing::{Fixture, fixed_provider};

    #[tokio::test]
    async fn test_get_rooms_lists_active_rooms() {
        // テスト項目: 作成されたルームだけが一覧に出る
        // given (前提条件):
        let fixture = Fixture::new();
        let join = fixture.join_usecase(fixed_provider(9));
        for name in ["u1", "u2", "u3"] {
            let client = fixture.open().await;
            fixture.join(&join, &client, name).await;
        }
        let usecase = GetRoomsUseCase::new(fixture.rooms.clone());

        // when (操作):
        let rooms = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(rooms.len(), 1);
        let names: Vec<&str> = rooms[0]
            .occupants
            .iter()
            .map(|c| c.user_id.as_str())
            .collect();
        assert_eq!(names, vec!["u1", "u2"]);
    }
}
