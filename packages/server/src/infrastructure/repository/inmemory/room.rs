//! InMemory Room Registry 実装
//!
//! ドメイン層が定義する RoomRegistry trait の具体的な実装。
//! BTreeMap をインメモリ DB として使用します（一覧が ID 順になる）。

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Identity, RepositoryError, Room, RoomId, RoomRegistry};

/// インメモリ Room Registry
#[derive(Default)]
pub struct InMemoryRoomRegistry {
    rooms: Mutex<BTreeMap<RoomId, Room>>,
}

impl InMemoryRoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomRegistry for InMemoryRoomRegistry {
    async fn create_room(&self, room: Room) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        if rooms.contains_key(&room.id) {
            return Err(RepositoryError::RoomAlreadyExists(
                room.id.as_str().to_string(),
            ));
        }
        rooms.insert(room.id.clone(), room);
        Ok(())
    }

    async fn get_room(&self, room_id: &RoomId) -> Option<Room> {
        let rooms = self.rooms.lock().await;
        rooms.get(room_id).cloned()
    }

    async fn list_rooms(&self) -> Vec<Room> {
        let rooms = self.rooms.lock().await;
        rooms.values().cloned().collect()
    }

    async fn room_exists(&self, room_id: &RoomId) -> bool {
        let rooms = self.rooms.lock().await;
        rooms.contains_key(room_id)
    }

    async fn append_member(
        &self,
        room_id: &RoomId,
        identity: Identity,
    ) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(room_id)
            .ok_or_else(|| RepositoryError::RoomNotFound(room_id.as_str().to_string()))?;
        room.record_member(identity);
        Ok(())
    }

    async fn delete_room(&self, room_id: &RoomId) -> Result<Room, RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        rooms
            .remove(room_id)
            .ok_or_else(|| RepositoryError::RoomNotFound(room_id.as_str().to_string()))
    }
}
