//! UseCase: ルーム退出処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveRoomUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 最後の参加者が退出するとマネージャが破棄されることを保証
//! - ルーム削除と競合した退出が no-op になることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者の退出（他の参加者は残る）
//! - エッジケース：最後の参加者の退出、削除済みルームからの退出、二重退出

use std::sync::Arc;

use crate::{
    domain::{ConnectionId, Identity, RoomId},
    infrastructure::RoomHub,
};

/// 退出結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// 登録を解除した
    Left {
        /// 最後の参加者だったためマネージャを破棄した
        room_discarded: bool,
    },
    /// 既に解除済み・置き換え済み・ルーム削除済み（何もしない）
    AlreadyGone,
}

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    hub: Arc<RoomHub>,
}

impl LeaveRoomUseCase {
    pub fn new(hub: Arc<RoomHub>) -> Self {
        Self { hub }
    }

    /// 接続の登録を解除する
    ///
    /// 解除後にマネージャが空になった場合はマネージャを破棄する（次の参加で再生成される）。
    pub async fn execute(
        &self,
        room_id: &RoomId,
        identity: &Identity,
        connection_id: ConnectionId,
    ) -> LeaveOutcome {
        let mut hub = self.hub.lock().await;

        let Some(manager) = hub.get(room_id) else {
            return LeaveOutcome::AlreadyGone;
        };

        if !manager.unregister_connection(identity, connection_id).await {
            return LeaveOutcome::AlreadyGone;
        }

        tracing::info!("Room[{}]: {} left.", room_id, identity);

        let room_discarded = manager.is_empty().await;
        if room_discarded {
            hub.remove(room_id);
        }

        LeaveOutcome::Left { room_discarded }
    }
}
