//! ID の生成

use uuid::Uuid;

use super::value_object::RoomId;

/// RoomId の生成
pub struct RoomIdFactory;

impl RoomIdFactory {
    /// 新しい一意な RoomId を生成（UUID v4）
    pub fn generate() -> RoomId {
        RoomId::from(Uuid::new_v4())
    }
}
