//! UseCase: ルーム削除（強制終了）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DeleteRoomUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 削除時に全参加者の接続が正常終了コードでクローズされることを保証
//! - 誰も参加していないルームの削除が問題なく行えることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者がいるルームの削除
//! - エッジケース：参加者がいない（マネージャが無い）ルームの削除
//! - 異常系：存在しないルームの削除

use std::sync::Arc;

use crate::{
    domain::{CloseReason, RoomId, RoomRegistry},
    infrastructure::RoomHub,
};

use super::error::DeleteRoomError;

/// ルーム削除のユースケース
pub struct DeleteRoomUseCase {
    room_registry: Arc<dyn RoomRegistry>,
    hub: Arc<RoomHub>,
}

impl DeleteRoomUseCase {
    pub fn new(room_registry: Arc<dyn RoomRegistry>, hub: Arc<RoomHub>) -> Self {
        Self { room_registry, hub }
    }

    /// ルームを削除する
    ///
    /// 1. マネージャがあれば全接続を "Room deleted" でクローズ
    /// 2. マネージャを破棄
    /// 3. メタデータを削除
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - クローズを開始した接続数
    /// * `Err(DeleteRoomError)` - ルームが存在しない
    pub async fn execute(&self, room_id: &RoomId) -> Result<usize, DeleteRoomError> {
        let mut hub = self.hub.lock().await;

        if !self.room_registry.room_exists(room_id).await {
            return Err(DeleteRoomError::RoomNotFound(room_id.as_str().to_string()));
        }

        tracing::info!("Deleting Room: {}", room_id);

        let closed = match hub.remove(room_id) {
            Some(manager) => manager.close_all(CloseReason::room_deleted()).await,
            None => 0,
        };

        self.room_registry
            .delete_room(room_id)
            .await
            .map_err(|_| DeleteRoomError::RoomNotFound(room_id.as_str().to_string()))?;

        tracing::info!("Room[{}] deleted, {} connection(s) closed", room_id, closed);

        Ok(closed)
    }
}
