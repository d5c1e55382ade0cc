//! UseCase: ルーム詳細の取得

use std::sync::Arc;

use crate::domain::{Room, RoomId, RoomStore};

use super::error::GetRoomDetailError;

/// ルーム詳細を取得するユースケース
pub struct GetRoomDetailUseCase {
    rooms: Arc<dyn RoomStore>,
}

impl GetRoomDetailUseCase {
    pub fn new(rooms: Arc<dyn RoomStore>) -> Self {
        Self { rooms }
    }

    /// # Arguments
    ///
    /// * `room_id` - パスで指定されたルーム ID
    pub async fn execute(&self, room_id: String) -> Result<Room, GetRoomDetailError> {
        let room_id = RoomId::new(room_id).map_err(|_| GetRoomDetailError::InvalidRoomId)?;
        self.rooms
            .get(&room_id)
            .await
            .ok_or(GetRoomDetailError::RoomNotFound)
    }
}
