//! UseCase: ログインとトークン認証
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LoginUseCase::login_user() / login_admin()
//! - AuthenticateUseCase::execute()
//!
//! ### どのような状況を想定しているか
//! - 正常系：共有パスワードでのログイン、管理者プレフィックス付きの管理者ログイン
//! - 異常系：パスワード誤り、プレフィックスの無い管理者ログイン
//! - エッジケース：ユーザー用トークンでの管理者認証

use std::sync::Arc;

use crate::domain::{Identity, IdentityStore, Role, Session, Token, UserRepository};

use super::error::LoginError;

/// ログイン判定のポリシー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPolicy {
    /// 全アカウント共通のパスワード
    pub shared_password: String,
    /// 管理者ログインに必要なユーザー名のプレフィックス
    pub admin_prefix: String,
}

impl Default for AuthPolicy {
    fn default() -> Self {
        Self {
            shared_password: "123456".to_string(),
            admin_prefix: "admin".to_string(),
        }
    }
}

/// ログインのユースケース
pub struct LoginUseCase {
    identity_store: Arc<dyn IdentityStore>,
    user_repository: Arc<dyn UserRepository>,
    policy: AuthPolicy,
}

impl LoginUseCase {
    pub fn new(
        identity_store: Arc<dyn IdentityStore>,
        user_repository: Arc<dyn UserRepository>,
        policy: AuthPolicy,
    ) -> Self {
        Self {
            identity_store,
            user_repository,
            policy,
        }
    }

    /// ユーザーとしてログインし、トークンを発行する
    pub async fn login_user(
        &self,
        username: String,
        password: &str,
    ) -> Result<(Identity, Token), LoginError> {
        if password != self.policy.shared_password {
            return Err(LoginError::InvalidCredentials);
        }
        let identity = Identity::new(username)?;

        self.user_repository.ensure_user(identity.clone()).await;
        let token = self
            .identity_store
            .issue_token(identity.clone(), Role::User)
            .await;

        tracing::info!("User '{}' logged in", identity);
        Ok((identity, token))
    }

    /// 管理者としてログインし、トークンを発行する
    pub async fn login_admin(
        &self,
        username: String,
        password: &str,
    ) -> Result<(Identity, Token), LoginError> {
        if !username.starts_with(&self.policy.admin_prefix)
            || password != self.policy.shared_password
        {
            return Err(LoginError::InvalidCredentials);
        }
        let identity = Identity::new(username)?;

        let token = self
            .identity_store
            .issue_token(identity.clone(), Role::Admin)
            .await;

        tracing::info!("Admin '{}' logged in", identity);
        Ok((identity, token))
    }
}

/// Bearer トークン認証のユースケース
pub struct AuthenticateUseCase {
    identity_store: Arc<dyn IdentityStore>,
}

impl AuthenticateUseCase {
    pub fn new(identity_store: Arc<dyn IdentityStore>) -> Self {
        Self { identity_store }
    }

    /// トークンを検証し、要求された種別のセッションを返す
    pub async fn execute(&self, token: &str, role: Role) -> Option<Session> {
        self.identity_store
            .resolve(token)
            .await
            .filter(|session| session.role == role)
    }
}
