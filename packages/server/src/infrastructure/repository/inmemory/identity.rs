//! InMemory Identity Store 実装

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Identity, IdentityStore, Role, Session, Token};

#[derive(Default)]
struct TokenTables {
    /// Key: トークン文字列
    by_token: HashMap<String, Session>,
    /// Key: (Identity, 種別) → 現在有効なトークン
    by_identity: HashMap<(Identity, Role), Token>,
}

/// インメモリ Identity Store
#[derive(Default)]
pub struct InMemoryIdentityStore {
    tables: Mutex<TokenTables>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn issue_token(&self, identity: Identity, role: Role) -> Token {
        let token = Token::generate();
        let mut tables = self.tables.lock().await;

        if let Some(previous) = tables
            .by_identity
            .insert((identity.clone(), role), token.clone())
        {
            tables.by_token.remove(previous.as_str());
            tracing::debug!("Revoked previous {:?} token of '{}'", role, identity);
        }
        tables.by_token.insert(
            token.as_str().to_string(),
            Session {
                identity,
                token: token.clone(),
                role,
            },
        );

        token
    }

    async fn resolve(&self, token: &str) -> Option<Session> {
        let tables = self.tables.lock().await;
        tables.by_token.get(token).cloned()
    }

    async fn list_sessions(&self) -> Vec<Session> {
        let tables = self.tables.lock().await;
        let mut sessions: Vec<Session> = tables.by_token.values().cloned().collect();
        sessions.sort_by(|a, b| {
            let rank = |role: Role| match role {
                Role::Admin => 0,
                Role::User => 1,
            };
            rank(a.role)
                .cmp(&rank(b.role))
                .then_with(|| a.identity.cmp(&b.identity))
        });
        sessions
    }
}
