//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{RepositoryError, ValueObjectError};

/// 参加前の認証エラー（アップグレード前に拒否）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// トークンが無い・解決できない
    #[error("Could not validate credentials")]
    Unauthorized,
}

/// ルーム参加のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    /// ルームが存在しない（アップグレード後に forbidden で拒否）
    #[error("Room '{0}' not found")]
    RoomNotFound(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeleteRoomError {
    #[error("Room '{0}' not found")]
    RoomNotFound(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    #[error("Incorrect username or password")]
    InvalidCredentials,

    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] ValueObjectError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateRoomError {
    #[error("Room '{0}' already exists")]
    AlreadyExists(String),

    #[error(transparent)]
    Repository(RepositoryError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("Room '{0}' not found")]
    RoomNotFound(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("User '{0}' not found")]
    UserNotFound(String),

    #[error(transparent)]
    Repository(RepositoryError),
}
