//! エンティティ

use std::collections::HashSet;

use serde::Serialize;

use super::value_object::{Identity, RoomId, Timestamp, Token};

/// 配送先
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipients {
    /// 送信者以外のルーム全員
    Everyone,
    /// 指定された参加者のみ（重複は除去済み）
    ///
    /// 宛先がすべて不正な名前だった場合は空集合になり、誰にも配送されない。
    Only(HashSet<Identity>),
}

impl Recipients {
    pub fn is_broadcast(&self) -> bool {
        matches!(self, Self::Everyone)
    }
}

/// ルーティング対象のメッセージ
///
/// `from` は常にサーバ側で認証済みの Identity が刻印される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub from: Identity,
    pub recipients: Recipients,
    pub data: String,
}

impl Envelope {
    pub fn new(from: Identity, recipients: Recipients, data: String) -> Self {
        Self {
            from,
            recipients,
            data,
        }
    }
}

/// ルームのメタデータ
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Room {
    pub id: RoomId,
    /// 作成時に管理者が渡した任意の属性
    pub attributes: serde_json::Value,
    /// 参加したことのある Identity（初回参加順、重複なし）
    ///
    /// 一覧表示用であり、配送判定には使わない。
    pub members: Vec<Identity>,
    pub created_at: Timestamp,
}

impl Room {
    pub fn new(id: RoomId, attributes: serde_json::Value, created_at: Timestamp) -> Self {
        Self {
            id,
            attributes,
            members: Vec::new(),
            created_at,
        }
    }

    /// 参加者を記録する（既に記録済みなら何もしない）
    ///
    /// 新規に追加した場合は `true` を返す。
    pub fn record_member(&mut self, identity: Identity) -> bool {
        if self.members.contains(&identity) {
            return false;
        }
        self.members.push(identity);
        true
    }
}

/// トークンの種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// 発行済みトークンと Identity の組
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub identity: Identity,
    pub token: Token,
    pub role: Role,
}

/// ユーザーのプロフィール
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub id: Identity,
    pub profile: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(name: &str) -> Identity {
        Identity::new(name.to_string()).unwrap()
    }

    #[test]
    fn test_room_records_each_member_once() {
        // テスト項目: 同じ参加者を複数回記録しても1件のみ残る
        // given (前提条件):
        let mut room = Room::new(
            RoomId::new("r1".to_string()).unwrap(),
            serde_json::json!({}),
            Timestamp::new(0),
        );

        // when (操作):
        let first = room.record_member(identity("kevin"));
        let second = room.record_member(identity("admin"));
        let again = room.record_member(identity("kevin"));

        // then (期待する結果):
        assert!(first);
        assert!(second);
        assert!(!again);
        assert_eq!(room.members, vec![identity("kevin"), identity("admin")]);
    }
}
