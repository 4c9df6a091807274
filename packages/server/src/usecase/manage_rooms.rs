//! UseCase: ルームの作成・参照

use std::sync::Arc;

use puppet_shared::time::Clock;

use crate::{
    domain::{Identity, RepositoryError, Room, RoomId, RoomRegistry, Timestamp},
    infrastructure::RoomHub,
};

use super::error::{CreateRoomError, GetRoomDetailError};

/// ルーム作成のユースケース
pub struct CreateRoomUseCase {
    room_registry: Arc<dyn RoomRegistry>,
    clock: Arc<dyn Clock>,
}

impl CreateRoomUseCase {
    pub fn new(room_registry: Arc<dyn RoomRegistry>, clock: Arc<dyn Clock>) -> Self {
        Self {
            room_registry,
            clock,
        }
    }

    pub async fn execute(
        &self,
        room_id: RoomId,
        attributes: serde_json::Value,
    ) -> Result<Room, CreateRoomError> {
        let room = Room::new(room_id, attributes, Timestamp::new(self.clock.now_millis()));

        self.room_registry
            .create_room(room.clone())
            .await
            .map_err(|e| match e {
                RepositoryError::RoomAlreadyExists(id) => CreateRoomError::AlreadyExists(id),
                other => CreateRoomError::Repository(other),
            })?;

        tracing::info!("Room {} created", room.id);
        Ok(room)
    }
}

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    room_registry: Arc<dyn RoomRegistry>,
}

impl GetRoomsUseCase {
    pub fn new(room_registry: Arc<dyn RoomRegistry>) -> Self {
        Self { room_registry }
    }

    pub async fn execute(&self) -> Vec<Room> {
        self.room_registry.list_rooms().await
    }
}

/// ルーム詳細（メタデータと現在の接続者）
#[derive(Debug, Clone, PartialEq)]
pub struct RoomDetail {
    pub room: Room,
    pub connected: Vec<Identity>,
}

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    room_registry: Arc<dyn RoomRegistry>,
    hub: Arc<RoomHub>,
}

impl GetRoomDetailUseCase {
    pub fn new(room_registry: Arc<dyn RoomRegistry>, hub: Arc<RoomHub>) -> Self {
        Self { room_registry, hub }
    }

    pub async fn execute(&self, room_id: &RoomId) -> Result<RoomDetail, GetRoomDetailError> {
        let room = self
            .room_registry
            .get_room(room_id)
            .await
            .ok_or_else(|| GetRoomDetailError::RoomNotFound(room_id.as_str().to_string()))?;

        let connected = match self.hub.get(room_id).await {
            Some(manager) => manager.identities().await,
            None => Vec::new(),
        };

        Ok(RoomDetail { room, connected })
    }
}

#[cfg(test)]
mod tests {
    use puppet_shared::time::{FixedClock, SystemClock};

    use super::*;
    use crate::{
        domain::ClientConnection, domain::repository::MockRoomRegistry,
        infrastructure::repository::InMemoryRoomRegistry,
    };

    fn room_id(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_create_room_then_duplicate() {
        // テスト項目: ルームを作成でき、同じ ID の二重作成はエラーになる
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let usecase =
            CreateRoomUseCase::new(registry.clone(), Arc::new(FixedClock::new(1_700_000_000_000)));

        // when (操作):
        let first = usecase
            .execute(room_id("kevin_room"), serde_json::json!({"creator": "kevin"}))
            .await
            .unwrap();
        let second = usecase.execute(room_id("kevin_room"), serde_json::json!({})).await;

        // then (期待する結果):
        assert_eq!(first.attributes["creator"], "kevin");
        assert_eq!(first.created_at, Timestamp::new(1_700_000_000_000));
        assert_eq!(
            second,
            Err(CreateRoomError::AlreadyExists("kevin_room".to_string()))
        );
    }

    #[tokio::test]
    async fn test_room_detail_lists_connected_identities() {
        // テスト項目: ルーム詳細に現在の接続者が含まれる
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        CreateRoomUseCase::new(registry.clone(), Arc::new(SystemClock))
            .execute(room_id("r1"), serde_json::json!({}))
            .await
            .unwrap();
        let hub = Arc::new(RoomHub::new());
        let (kevin, _rx) = ClientConnection::open(Identity::new("kevin".to_string()).unwrap());
        hub.lock().await.get_or_create(&room_id("r1")).register(kevin).await;
        let usecase = GetRoomDetailUseCase::new(registry, hub);

        // when (操作):
        let detail = usecase.execute(&room_id("r1")).await.unwrap();

        // then (期待する結果):
        assert_eq!(detail.room.id, room_id("r1"));
        assert_eq!(
            detail.connected,
            vec![Identity::new("kevin".to_string()).unwrap()]
        );
    }

    #[tokio::test]
    async fn test_room_detail_not_found() {
        // テスト項目: 存在しないルームの詳細取得はエラーになる
        // given (前提条件):
        let mut registry = MockRoomRegistry::new();
        registry.expect_get_room().returning(|_| None);
        let usecase = GetRoomDetailUseCase::new(Arc::new(registry), Arc::new(RoomHub::new()));

        // when (操作):
        let result = usecase.execute(&room_id("nope")).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(GetRoomDetailError::RoomNotFound("nope".to_string()))
        );
    }
}
