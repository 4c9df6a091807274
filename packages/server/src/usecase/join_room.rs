//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::authenticate() / execute()
//!
//! ### なぜこのテストが必要か
//! - 認証失敗はルームの状態に一切触れずに拒否されることを保証
//! - 存在しないルームへの参加は ConnectionManager を生成しないことを保証
//! - 同じ Identity の二重参加で古い接続がクローズされることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：初回参加でマネージャが生成され、メンバーとして記録される
//! - 異常系：トークン無し・不明なトークン・存在しないルーム
//! - エッジケース：同じ Identity による再参加

use std::sync::Arc;

use crate::{
    domain::{ClientConnection, CloseReason, Identity, IdentityStore, RoomId, RoomRegistry},
    infrastructure::RoomHub,
};

use super::error::{AuthError, JoinError};

/// 参加結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinOutcome {
    /// 同じ Identity の古い接続を置き換えたか
    pub displaced: bool,
    /// 参加後の接続数
    pub connected: usize,
}

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    identity_store: Arc<dyn IdentityStore>,
    room_registry: Arc<dyn RoomRegistry>,
    hub: Arc<RoomHub>,
}

impl JoinRoomUseCase {
    pub fn new(
        identity_store: Arc<dyn IdentityStore>,
        room_registry: Arc<dyn RoomRegistry>,
        hub: Arc<RoomHub>,
    ) -> Self {
        Self {
            identity_store,
            room_registry,
            hub,
        }
    }

    /// トークンから Identity を解決する
    ///
    /// ルームの状態には触れない。
    pub async fn authenticate(&self, token: Option<&str>) -> Result<Identity, AuthError> {
        let token = token.ok_or(AuthError::Unauthorized)?;
        self.identity_store
            .resolve_identity(token)
            .await
            .ok_or(AuthError::Unauthorized)
    }

    /// ハンドシェイク済みの接続をルームに登録する
    ///
    /// 存在確認・マネージャの取得/生成・登録は RoomHub のガード下で一括して行う。
    pub async fn execute(
        &self,
        room_id: &RoomId,
        connection: ClientConnection,
    ) -> Result<JoinOutcome, JoinError> {
        let mut hub = self.hub.lock().await;

        if !self.room_registry.room_exists(room_id).await {
            return Err(JoinError::RoomNotFound(room_id.as_str().to_string()));
        }

        let identity = connection.identity().clone();
        let manager = hub.get_or_create(room_id);
        let displaced = manager.register(connection).await;

        if let Some(previous) = &displaced {
            tracing::info!(
                "Room[{}]: {} reconnected, closing previous connection {}",
                room_id,
                identity,
                previous.id()
            );
            previous.close(CloseReason::superseded());
        }

        if let Err(e) = self
            .room_registry
            .append_member(room_id, identity.clone())
            .await
        {
            tracing::warn!("Room[{}]: failed to record member '{}': {}", room_id, identity, e);
        }

        tracing::info!("Room[{}]: {} entered.", room_id, identity);

        Ok(JoinOutcome {
            displaced: displaced.is_some(),
            connected: manager.len().await,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        CloseOutcome, OutboundFrame, Role, Session, Token,
        repository::{MockIdentityStore, MockRoomRegistry},
    };

    fn identity(name: &str) -> Identity {
        Identity::new(name.to_string()).unwrap()
    }

    fn room_id(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    fn registry_with_room(id: &'static str) -> MockRoomRegistry {
        let mut registry = MockRoomRegistry::new();
        registry
            .expect_room_exists()
            .returning(move |room| room.as_str() == id);
        registry.expect_append_member().returning(|_, _| Ok(()));
        registry
    }

    fn usecase(
        identity_store: MockIdentityStore,
        registry: MockRoomRegistry,
    ) -> (JoinRoomUseCase, Arc<RoomHub>) {
        let hub = Arc::new(RoomHub::new());
        let usecase =
            JoinRoomUseCase::new(Arc::new(identity_store), Arc::new(registry), hub.clone());
        (usecase, hub)
    }

    #[tokio::test]
    async fn test_authenticate_without_token_is_unauthorized() {
        // テスト項目: トークン無しの場合は Identity Store を呼ばずに拒否される
        // given (前提条件):
        let mut identity_store = MockIdentityStore::new();
        identity_store.expect_resolve_identity().never();
        let (usecase, _hub) = usecase(identity_store, MockRoomRegistry::new());

        // when (操作):
        let result = usecase.authenticate(None).await;

        // then (期待する結果):
        assert_eq!(result, Err(AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn test_authenticate_unknown_token_is_unauthorized() {
        // テスト項目: 解決できないトークンは拒否される
        // given (前提条件):
        let mut identity_store = MockIdentityStore::new();
        identity_store
            .expect_resolve_identity()
            .withf(|token| token == "bogus")
            .returning(|_| None);
        let (usecase, _hub) = usecase(identity_store, MockRoomRegistry::new());

        // when (操作):
        let result = usecase.authenticate(Some("bogus")).await;

        // then (期待する結果):
        assert_eq!(result, Err(AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn test_authenticate_resolves_identity() {
        // テスト項目: 有効なトークンから Identity が解決される
        // given (前提条件):
        let mut identity_store = MockIdentityStore::new();
        identity_store
            .expect_resolve_identity()
            .withf(|token| token == "t-kevin")
            .returning(|_| Some(Identity::new("kevin".to_string()).unwrap()));
        let (usecase, _hub) = usecase(identity_store, MockRoomRegistry::new());

        // when (操作):
        let result = usecase.authenticate(Some("t-kevin")).await;

        // then (期待する結果):
        assert_eq!(result, Ok(identity("kevin")));
    }

    #[tokio::test]
    async fn test_join_missing_room_is_rejected_without_manager() {
        // テスト項目: 存在しないルームへの参加は拒否され、マネージャは生成されない
        // given (前提条件):
        let mut registry = MockRoomRegistry::new();
        registry.expect_room_exists().returning(|_| false);
        registry.expect_append_member().never();
        let (usecase, hub) = usecase(MockIdentityStore::new(), registry);
        let (connection, _rx) = ClientConnection::open(identity("kevin"));

        // when (操作):
        let result = usecase.execute(&room_id("nope"), connection).await;

        // then (期待する結果):
        assert_eq!(result, Err(JoinError::RoomNotFound("nope".to_string())));
        assert!(hub.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_first_join_creates_manager_and_records_member() {
        // テスト項目: 初回参加でマネージャが生成され、メンバーとして記録される
        // given (前提条件):
        let mut registry = MockRoomRegistry::new();
        registry.expect_room_exists().returning(|_| true);
        registry
            .expect_append_member()
            .withf(|room, who| room.as_str() == "r1" && who.as_str() == "kevin")
            .times(1)
            .returning(|_, _| Ok(()));
        let (usecase, hub) = usecase(MockIdentityStore::new(), registry);
        let (connection, _rx) = ClientConnection::open(identity("kevin"));

        // when (操作):
        let result = usecase.execute(&room_id("r1"), connection).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Ok(JoinOutcome {
                displaced: false,
                connected: 1
            })
        );
        let manager = hub.get(&room_id("r1")).await.unwrap();
        assert_eq!(manager.identities().await, vec![identity("kevin")]);
    }

    #[tokio::test]
    async fn test_second_join_supersedes_previous_connection() {
        // テスト項目: 同じ Identity で再参加すると古い接続は 4409 でクローズされる
        // given (前提条件):
        let (usecase, hub) = usecase(MockIdentityStore::new(), registry_with_room("r1"));
        let (old, mut old_rx) = ClientConnection::open(identity("kevin"));
        let (new, _new_rx) = ClientConnection::open(identity("kevin"));
        usecase.execute(&room_id("r1"), old.clone()).await.unwrap();

        // when (操作):
        let result = usecase.execute(&room_id("r1"), new.clone()).await;

        // then (期待する結果):
        assert_eq!(result.map(|o| o.displaced), Ok(true));
        assert_eq!(
            old_rx.recv().await,
            Some(OutboundFrame::Close(CloseReason::superseded()))
        );
        assert_eq!(old.close(CloseReason::room_deleted()), CloseOutcome::AlreadyClosed);
        assert!(new.is_connected());
        assert_eq!(hub.get(&room_id("r1")).await.unwrap().len().await, 1);
    }

    #[tokio::test]
    async fn test_session_token_round_trip_with_real_store() {
        // テスト項目: 実際の Identity Store で発行したトークンで認証できる
        // given (前提条件):
        use crate::infrastructure::repository::InMemoryIdentityStore;
        let store = Arc::new(InMemoryIdentityStore::new());
        let token: Token = store.issue_token(identity("admin"), Role::Admin).await;
        let usecase = JoinRoomUseCase::new(
            store.clone(),
            Arc::new(registry_with_room("r1")),
            Arc::new(RoomHub::new()),
        );

        // when (操作):
        let result = usecase.authenticate(Some(token.as_str())).await;

        // then (期待する結果):
        assert_eq!(result, Ok(identity("admin")));
        let session: Option<Session> = store.resolve(token.as_str()).await;
        assert_eq!(session.map(|s| s.role), Some(Role::Admin));
    }
}
