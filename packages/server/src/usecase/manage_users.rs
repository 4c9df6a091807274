//! UseCase: ユーザー・セッションの参照と更新

use std::sync::Arc;

use crate::domain::{
    Identity, IdentityStore, RepositoryError, Session, UserProfile, UserRepository,
};

use super::error::ProfileError;

/// 自分のプロフィール取得
pub struct GetProfileUseCase {
    user_repository: Arc<dyn UserRepository>,
}

impl GetProfileUseCase {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    pub async fn execute(&self, identity: &Identity) -> Result<UserProfile, ProfileError> {
        self.user_repository
            .get_profile(identity)
            .await
            .ok_or_else(|| ProfileError::UserNotFound(identity.as_str().to_string()))
    }
}

/// 自分のプロフィール更新
pub struct UpdateProfileUseCase {
    user_repository: Arc<dyn UserRepository>,
}

impl UpdateProfileUseCase {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    pub async fn execute(
        &self,
        identity: &Identity,
        profile: serde_json::Value,
    ) -> Result<UserProfile, ProfileError> {
        self.user_repository
            .update_profile(identity, profile)
            .await
            .map_err(|e| match e {
                RepositoryError::UserNotFound(id) => ProfileError::UserNotFound(id),
                other => ProfileError::Repository(other),
            })
    }
}

/// ユーザー一覧（管理者向け）
pub struct GetUsersUseCase {
    user_repository: Arc<dyn UserRepository>,
}

impl GetUsersUseCase {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    pub async fn execute(&self) -> Vec<UserProfile> {
        self.user_repository.list_users().await
    }
}

/// セッション一覧（管理者向け）
pub struct GetSessionsUseCase {
    identity_store: Arc<dyn IdentityStore>,
}

impl GetSessionsUseCase {
    pub fn new(identity_store: Arc<dyn IdentityStore>) -> Self {
        Self { identity_store }
    }

    pub async fn execute(&self) -> Vec<Session> {
        self.identity_store.list_sessions().await
    }
}
