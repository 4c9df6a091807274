//! UseCase: メッセージのルーティング
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RouteMessageUseCase::execute() メソッド
//!
//! ### どのような状況を想定しているか
//! - 正常系：ブロードキャスト（送信者以外）と宛先指定送信
//! - エッジケース：ルームが削除済み、送信者の接続が既に置き換え/解除済み

use std::sync::Arc;

use crate::{
    domain::{ConnectionId, Envelope, Recipients, RoomId},
    infrastructure::RoomHub,
};

/// メッセージルーティングのユースケース
pub struct RouteMessageUseCase {
    hub: Arc<RoomHub>,
}

impl RouteMessageUseCase {
    pub fn new(hub: Arc<RoomHub>) -> Self {
        Self { hub }
    }

    /// Envelope を配送する
    ///
    /// # Arguments
    ///
    /// * `room_id` - 送信者が参加しているルーム
    /// * `connection_id` - 送信者の接続 ID
    /// * `envelope` - 送信者が刻印済みの Envelope
    /// * `payload` - 配送する JSON（送信フレーム）
    ///
    /// # Returns
    ///
    /// 配送できた件数。ルームが削除済み、または送信者の接続がもう登録されていない
    /// 場合は何もせず 0 を返す。
    pub async fn execute(
        &self,
        room_id: &RoomId,
        connection_id: ConnectionId,
        envelope: &Envelope,
        payload: &str,
    ) -> usize {
        let Some(manager) = self.hub.get(room_id).await else {
            tracing::debug!(
                "Room[{}]: no active manager, dropping message from '{}'",
                room_id,
                envelope.from
            );
            return 0;
        };

        if !manager.holds(&envelope.from, connection_id).await {
            tracing::debug!(
                "Room[{}]: '{}' ({}) is no longer registered, dropping message",
                room_id,
                envelope.from,
                connection_id
            );
            return 0;
        }

        match &envelope.recipients {
            Recipients::Everyone => manager.broadcast(payload, &envelope.from).await,
            Recipients::Only(targets) => manager.unicast(payload, targets).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClientConnection, Identity, OutboundFrame, Outbox};

    fn identity(name: &str) -> Identity {
        Identity::new(name.to_string()).unwrap()
    }

    fn room_id() -> RoomId {
        RoomId::new("r1".to_string()).unwrap()
    }

    async fn join(
        hub: &RoomHub,
        name: &str,
    ) -> (ClientConnection, Outbox) {
        let (connection, rx) = ClientConnection::open(identity(name));
        hub.lock()
            .await
            .get_or_create(&room_id())
            .register(connection.clone())
            .await;
        (connection, rx)
    }

    #[tokio::test]
    async fn test_broadcast_reaches_everyone_but_sender() {
        // テスト項目: to が無いメッセージは送信者以外の全員に届く
        // given (前提条件):
        let hub = Arc::new(RoomHub::new());
        let (kevin, mut kevin_rx) = join(&hub, "kevin").await;
        let (_admin, mut admin_rx) = join(&hub, "admin").await;
        let usecase = RouteMessageUseCase::new(hub);
        let envelope = Envelope::new(identity("kevin"), Recipients::Everyone, "yo".to_string());

        // when (操作):
        let delivered = usecase
            .execute(&room_id(), kevin.id(), &envelope, "payload")
            .await;

        // then (期待する結果):
        assert_eq!(delivered, 1);
        assert_eq!(
            admin_rx.recv().await,
            Some(OutboundFrame::Text("payload".to_string()))
        );
        assert!(kevin_rx.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_addressed_message_reaches_only_targets() {
        // テスト項目: 宛先指定メッセージは指定された参加者にだけ届く
        // given (前提条件):
        let hub = Arc::new(RoomHub::new());
        let (kevin, _kevin_rx) = join(&hub, "kevin").await;
        let (_admin, mut admin_rx) = join(&hub, "admin").await;
        let (_bob, mut bob_rx) = join(&hub, "bob").await;
        let usecase = RouteMessageUseCase::new(hub);
        let envelope = Envelope::new(
            identity("kevin"),
            Recipients::Only([identity("admin"), identity("ghost")].into_iter().collect()),
            "hi".to_string(),
        );

        // when (操作):
        let delivered = usecase
            .execute(&room_id(), kevin.id(), &envelope, "payload")
            .await;

        // then (期待する結果):
        assert_eq!(delivered, 1);
        assert!(admin_rx.recv().await.is_some());
        assert!(bob_rx.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_message_after_room_teardown_is_noop() {
        // テスト項目: マネージャが破棄済みのルームへの送信は何もしない
        // given (前提条件):
        let hub = Arc::new(RoomHub::new());
        let (kevin, _kevin_rx) = join(&hub, "kevin").await;
        hub.lock().await.remove(&room_id());
        let usecase = RouteMessageUseCase::new(hub);
        let envelope = Envelope::new(identity("kevin"), Recipients::Everyone, "x".to_string());

        // when (操作):
        let delivered = usecase.execute(&room_id(), kevin.id(), &envelope, "x").await;

        // then (期待する結果):
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn test_superseded_connection_cannot_send() {
        // テスト項目: 置き換えられた古い接続からのメッセージは配送されない
        // given (前提条件):
        let hub = Arc::new(RoomHub::new());
        let (old, _old_rx) = join(&hub, "kevin").await;
        let (_new, _new_rx) = join(&hub, "kevin").await;
        let (_admin, mut admin_rx) = join(&hub, "admin").await;
        let usecase = RouteMessageUseCase::new(hub);
        let envelope = Envelope::new(identity("kevin"), Recipients::Everyone, "x".to_string());

        // when (操作):
        let delivered = usecase.execute(&room_id(), old.id(), &envelope, "x").await;

        // then (期待する結果):
        assert_eq!(delivered, 0);
        assert!(admin_rx.try_recv().is_none());
    }
}
