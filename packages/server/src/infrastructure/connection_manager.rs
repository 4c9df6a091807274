//! ルームごとの接続管理
//!
//! ## 責務
//!
//! - 1 つのルームについて Identity → `ClientConnection` の対応を保持する
//! - 宛先指定送信（unicast）とブロードキャスト
//! - ルーム削除時の一斉クローズ（close_all）
//!
//! ## 並行性
//!
//! 接続マップへの変更（register / unregister / close_all）と走査（unicast / broadcast）は
//! すべて同じ `Mutex` の下で行われます。送信は送信キューへの push だけなので、
//! 遅いピアがロックを長時間握ることはありません。実際のソケット書き込みは
//! 接続ごとの pusher タスクが行います。

use std::collections::{HashMap, HashSet};

use tokio::sync::Mutex;

use crate::domain::{
    ClientConnection, CloseOutcome, CloseReason, ConnectionId, Identity, RoomId, SendOutcome,
};

/// 1 ルーム分の接続マネージャ
pub struct ConnectionManager {
    room_id: RoomId,
    /// Key: Identity, Value: 現在有効な接続
    connections: Mutex<HashMap<Identity, ClientConnection>>,
}

impl ConnectionManager {
    pub fn new(room_id: RoomId) -> Self {
        Self {
            room_id,
            connections: Mutex::new(HashMap::new()),
        }
    }

    /// 接続を登録する
    ///
    /// 同じ Identity の接続が既にある場合は置き換え、置き換えられた接続を返す。
    pub async fn register(&self, connection: ClientConnection) -> Option<ClientConnection> {
        let mut connections = self.connections.lock().await;
        let identity = connection.identity().clone();
        let displaced = connections.insert(identity.clone(), connection);
        tracing::debug!(
            "Room[{}]: '{}' registered ({} connected)",
            self.room_id,
            identity,
            connections.len()
        );
        displaced
    }

    /// 指定した Identity のうち、登録済みかつ接続中のものにだけ送信する
    ///
    /// 見つからない・切断済みの宛先は黙ってスキップする。配送できた件数を返す。
    pub async fn unicast(&self, payload: &str, targets: &HashSet<Identity>) -> usize {
        let connections = self.connections.lock().await;
        let mut delivered = 0;

        for target in targets {
            match connections.get(target) {
                Some(connection) => {
                    if Self::deliver(connection, payload) {
                        delivered += 1;
                    }
                }
                None => {
                    tracing::debug!(
                        "Room[{}]: '{}' not connected, skipping",
                        self.room_id,
                        target
                    );
                }
            }
        }

        delivered
    }

    /// 送信者以外の全員に送信する。配送できた件数を返す。
    pub async fn broadcast(&self, payload: &str, excluding: &Identity) -> usize {
        let connections = self.connections.lock().await;

        connections
            .iter()
            .filter(|(identity, _)| *identity != excluding)
            .filter(|(_, connection)| Self::deliver(connection, payload))
            .count()
    }

    /// Identity の登録を解除する（冪等）
    pub async fn unregister(&self, identity: &Identity) -> bool {
        let mut connections = self.connections.lock().await;
        let removed = connections.remove(identity).is_some();
        if removed {
            tracing::debug!("Room[{}]: '{}' unregistered", self.room_id, identity);
        }
        removed
    }

    /// 登録中の接続が `connection_id` と一致する場合のみ登録を解除する（冪等）
    ///
    /// 新しい接続に置き換えられた古い接続が、後継の登録を消さないようにするために使う。
    pub async fn unregister_connection(
        &self,
        identity: &Identity,
        connection_id: ConnectionId,
    ) -> bool {
        let mut connections = self.connections.lock().await;
        match connections.get(identity) {
            Some(current) if current.id() == connection_id => {
                connections.remove(identity);
                tracing::debug!(
                    "Room[{}]: '{}' ({}) unregistered",
                    self.room_id,
                    identity,
                    connection_id
                );
                true
            }
            _ => false,
        }
    }

    /// 全接続をクローズしてマップを空にする
    ///
    /// 各接続へのクローズは送信キューに積むだけで、ピアの応答は待たない。
    /// 既に閉じている接続は no-op。クローズを開始できた件数を返す。
    pub async fn close_all(&self, reason: CloseReason) -> usize {
        let mut connections = self.connections.lock().await;
        let mut initiated = 0;

        for (identity, connection) in connections.drain() {
            match connection.close(reason.clone()) {
                CloseOutcome::Initiated => initiated += 1,
                CloseOutcome::AlreadyClosed => {
                    tracing::debug!(
                        "Room[{}]: '{}' was already disconnected",
                        self.room_id,
                        identity
                    );
                }
            }
            tracing::info!("Room[{}]: {} left.", self.room_id, identity);
        }

        initiated
    }

    /// `identity` の現在の登録が `connection_id` の接続かどうか
    pub async fn holds(&self, identity: &Identity, connection_id: ConnectionId) -> bool {
        let connections = self.connections.lock().await;
        connections
            .get(identity)
            .is_some_and(|current| current.id() == connection_id)
    }

    pub async fn len(&self) -> usize {
        self.connections.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.connections.lock().await.is_empty()
    }

    /// 登録中の Identity 一覧（ソート済み）
    pub async fn identities(&self) -> Vec<Identity> {
        let connections = self.connections.lock().await;
        let mut identities: Vec<Identity> = connections.keys().cloned().collect();
        identities.sort();
        identities
    }

    fn deliver(connection: &ClientConnection, payload: &str) -> bool {
        match connection.send_text(payload.to_string()) {
            SendOutcome::Delivered => {
                tracing::debug!("Delivered message to '{}'", connection.identity());
                true
            }
            SendOutcome::NotConnected => {
                tracing::debug!(
                    "'{}' is not connected, message dropped",
                    connection.identity()
                );
                false
            }
        }
    }
}
