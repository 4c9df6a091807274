//! ドメイン層のエラー定義

use thiserror::Error;

/// 値オブジェクトの生成に失敗した場合のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("Identity must not be empty")]
    EmptyIdentity,

    #[error("Room ID must not be empty")]
    EmptyRoomId,

    #[error("Token must not be empty")]
    EmptyToken,
}

/// Repository 操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Room '{0}' not found")]
    RoomNotFound(String),

    #[error("Room '{0}' already exists")]
    RoomAlreadyExists(String),

    #[error("User '{0}' not found")]
    UserNotFound(String),
}
