//! InMemory RoomStore 実装
//!
//! ルーム本体と「接続 → ルーム」の逆引きを 1 つのロックで保護し、
//! 両者が食い違った状態を外から観測できないようにしています。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, RepositoryError, Room, RoomId, RoomStore};

#[derive(Default)]
struct RoomTable {
    rooms: HashMap<RoomId, Room>,
    by_connection: HashMap<ConnectionId, RoomId>,
}

/// インメモリ RoomStore 実装
#[derive(Default)]
pub struct InMemoryRoomStore {
    table: Mutex<RoomTable>,
}

impl InMemoryRoomStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomStore for InMemoryRoomStore {
    async fn insert(&self, room: Room) -> Result<(), RepositoryError> {
        let mut table = self.table.lock().await;
        if table.rooms.contains_key(&room.id) {
            return Err(RepositoryError::DuplicateRoomId(room.id.to_string()));
        }
        for connection_id in room.occupant_ids() {
            table.by_connection.insert(connection_id, room.id.clone());
        }
        table.rooms.insert(room.id.clone(), room);
        Ok(())
    }

    async fn get(&self, room_id: &RoomId) -> Option<Room> {
        let table = self.table.lock().await;
        table.rooms.get(room_id).cloned()
    }

    async fn find_by_connection(&self, connection_id: &ConnectionId) -> Option<Room> {
        let table = self.table.lock().await;
        table
            .by_connection
            .get(connection_id)
            .and_then(|room_id| table.rooms.get(room_id))
            .cloned()
    }

    async fn close(&self, room_id: &RoomId) -> Option<Room> {
        let mut table = self.table.lock().await;
        let mut room = table.rooms.remove(room_id)?;
        for connection_id in room.occupant_ids() {
            table.by_connection.remove(&connection_id);
        }
        room.close();
        tracing::debug!("Room '{}' closed", room.id);
        Some(room)
    }

    async fn list(&self) -> Vec<Room> {
        let table = self.table.lock().await;
        let mut rooms: Vec<Room> = table.rooms.values().cloned().collect();
        rooms.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });
        rooms
    }

    async fn count(&self) -> usize {
        let table = self.table.lock().await;
        table.rooms.len()
    }
}
