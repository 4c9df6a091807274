//! Repository trait 定義
//!
//! ルーム中核部が利用する外部コラボレータのインターフェースです。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! 中核部はこれらを同期済みのストアとして扱い、点参照・点更新のみを行います。

use async_trait::async_trait;

use super::{
    Identity, RepositoryError, Role, Room, RoomId, Session, Token, UserProfile,
};

/// トークン → Identity の対応を管理するストア
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// トークンを発行する（同じ Identity・同じ種別の古いトークンは失効する）
    async fn issue_token(&self, identity: Identity, role: Role) -> Token;

    /// トークンからセッションを解決する
    async fn resolve(&self, token: &str) -> Option<Session>;

    /// トークンから Identity を解決する
    async fn resolve_identity(&self, token: &str) -> Option<Identity> {
        self.resolve(token).await.map(|session| session.identity)
    }

    /// 発行済みセッションの一覧（管理者が先、ユーザーが後）
    async fn list_sessions(&self) -> Vec<Session>;
}

/// ルームのメタデータを管理するレジストリ
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomRegistry: Send + Sync {
    async fn create_room(&self, room: Room) -> Result<(), RepositoryError>;

    async fn get_room(&self, room_id: &RoomId) -> Option<Room>;

    /// ルーム一覧（ID 順）
    async fn list_rooms(&self) -> Vec<Room>;

    async fn room_exists(&self, room_id: &RoomId) -> bool;

    /// 参加者を記録する（既に記録済みなら何もしない）
    async fn append_member(
        &self,
        room_id: &RoomId,
        identity: Identity,
    ) -> Result<(), RepositoryError>;

    async fn delete_room(&self, room_id: &RoomId) -> Result<Room, RepositoryError>;
}

/// ユーザープロフィールのストア
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// ログイン時に呼ばれる（未登録なら Identity 文字列をプロフィールとして登録）
    async fn ensure_user(&self, identity: Identity);

    async fn get_profile(&self, identity: &Identity) -> Option<UserProfile>;

    async fn update_profile(
        &self,
        identity: &Identity,
        profile: serde_json::Value,
    ) -> Result<UserProfile, RepositoryError>;

    /// ユーザー一覧（ID 順）
    async fn list_users(&self) -> Vec<UserProfile>;
}
