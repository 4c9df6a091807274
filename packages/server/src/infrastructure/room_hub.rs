//! アクティブなルームの ConnectionManager 一覧
//!
//! ## 設計ノート
//!
//! ConnectionManager の生成（最初の join）と破棄（最後の leave / ルーム削除）は
//! `RoomHub::lock()` で得られるガードの下で行います。
//! join・leave・削除の各ユースケースはガードを保持したまま
//! 「存在確認 → 取得/生成 → 登録」や「解除 → 空なら破棄」を行うため、
//! 破棄済みのマネージャに登録してしまう競合は起きません。
//!
//! ロック順序は常に RoomHub → ConnectionManager です。

use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, MutexGuard};

use crate::domain::RoomId;

use super::connection_manager::ConnectionManager;

#[derive(Default)]
pub struct RoomHub {
    managers: Mutex<HashMap<RoomId, Arc<ConnectionManager>>>,
}

impl RoomHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// ガードを取得する
    pub async fn lock(&self) -> RoomHubGuard<'_> {
        RoomHubGuard {
            managers: self.managers.lock().await,
        }
    }

    /// 現在のマネージャを取得する（ガードはすぐに解放される）
    pub async fn get(&self, room_id: &RoomId) -> Option<Arc<ConnectionManager>> {
        self.lock().await.get(room_id)
    }
}

/// RoomHub の排他ガード
pub struct RoomHubGuard<'a> {
    managers: MutexGuard<'a, HashMap<RoomId, Arc<ConnectionManager>>>,
}

impl RoomHubGuard<'_> {
    pub fn get(&self, room_id: &RoomId) -> Option<Arc<ConnectionManager>> {
        self.managers.get(room_id).cloned()
    }

    /// 接続のあるルームの数
    pub fn len(&self) -> usize {
        self.managers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.managers.is_empty()
    }

    /// マネージャを取得し、無ければ生成する
    pub fn get_or_create(&mut self, room_id: &RoomId) -> Arc<ConnectionManager> {
        if let Some(manager) = self.managers.get(room_id) {
            return manager.clone();
        }
        let manager = Arc::new(ConnectionManager::new(room_id.clone()));
        self.managers.insert(room_id.clone(), manager.clone());
        tracing::debug!(
            "Room[{}]: connection manager created ({} active rooms)",
            room_id,
            self.len()
        );
        manager
    }

    /// マネージャを取り除く（無ければ `None`）
    pub fn remove(&mut self, room_id: &RoomId) -> Option<Arc<ConnectionManager>> {
        let removed = self.managers.remove(room_id);
        if removed.is_some() {
            tracing::debug!(
                "Room[{}]: connection manager discarded ({} active rooms)",
                room_id,
                self.len()
            );
        }
        removed
    }
}
