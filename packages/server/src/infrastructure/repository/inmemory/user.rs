//! InMemory User Repository 実装

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Identity, RepositoryError, UserProfile, UserRepository};

/// インメモリ User Repository
///
/// Key: Identity, Value: 任意の JSON プロフィール
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<BTreeMap<Identity, serde_json::Value>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn ensure_user(&self, identity: Identity) {
        let mut users = self.users.lock().await;
        let default_profile = serde_json::Value::String(identity.as_str().to_string());
        users.entry(identity).or_insert(default_profile);
    }

    async fn get_profile(&self, identity: &Identity) -> Option<UserProfile> {
        let users = self.users.lock().await;
        users.get(identity).map(|profile| UserProfile {
            id: identity.clone(),
            profile: profile.clone(),
        })
    }

    async fn update_profile(
        &self,
        identity: &Identity,
        profile: serde_json::Value,
    ) -> Result<UserProfile, RepositoryError> {
        let mut users = self.users.lock().await;
        let slot = users
            .get_mut(identity)
            .ok_or_else(|| RepositoryError::UserNotFound(identity.as_str().to_string()))?;
        *slot = profile.clone();
        Ok(UserProfile {
            id: identity.clone(),
            profile,
        })
    }

    async fn list_users(&self) -> Vec<UserProfile> {
        let users = self.users.lock().await;
        users
            .iter()
            .map(|(id, profile)| UserProfile {
                id: id.clone(),
                profile: profile.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(name: &str) -> Identity {
        Identity::new(name.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_ensure_user_keeps_existing_profile() {
        // テスト項目: 再ログインしても更新済みプロフィールは上書きされない
        // given (前提条件):
        let repo = InMemoryUserRepository::new();
        repo.ensure_user(identity("kevin")).await;
        repo.update_profile(&identity("kevin"), serde_json::json!({"name": "Kevin Wu"}))
            .await
            .unwrap();

        // when (操作):
        repo.ensure_user(identity("kevin")).await;

        // then (期待する結果):
        let profile = repo.get_profile(&identity("kevin")).await.unwrap();
        assert_eq!(profile.profile["name"], "Kevin Wu");
    }

    #[tokio::test]
    async fn test_new_user_profile_defaults_to_identity() {
        // テスト項目: 初回ログイン時のプロフィールは Identity 文字列になる
        // given (前提条件):
        let repo = InMemoryUserRepository::new();

        // when (操作):
        repo.ensure_user(identity("kevin")).await;

        // then (期待する結果):
        let profile = repo.get_profile(&identity("kevin")).await.unwrap();
        assert_eq!(profile.profile, serde_json::json!("kevin"));
    }

    #[tokio::test]
    async fn test_update_unknown_user_fails() {
        // テスト項目: 未登録ユーザーのプロフィール更新はエラーになる
        // given (前提条件):
        let repo = InMemoryUserRepository::new();

        // when (操作):
        let result = repo
            .update_profile(&identity("ghost"), serde_json::json!({}))
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(RepositoryError::UserNotFound("ghost".to_string())));
    }

    #[tokio::test]
    async fn test_list_users_sorted_by_id() {
        // テスト項目: ユーザー一覧は ID 順に並ぶ
        // given (前提条件):
        let repo = InMemoryUserRepository::new();
        repo.ensure_user(identity("zoe")).await;
        repo.ensure_user(identity("kevin")).await;

        // when (操作):
        let users = repo.list_users().await;

        // then (期待する結果):
        let ids: Vec<&str> = users.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["kevin", "zoe"]);
    }
}
