//! Error types for the Puppet client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server refused the username / password
    #[error("Login failed: {0}")]
    LoginFailed(String),

    /// The WebSocket handshake was refused (HTTP 401)
    #[error("Token was rejected by the server")]
    Unauthorized,

    /// The room does not exist (close code 4403)
    #[error("Room not found: {0}")]
    RoomNotFound(String),

    /// Another connection joined the room with the same identity (close code 4409)
    #[error("Superseded by a newer connection")]
    Superseded,

    /// Server URL could not be turned into a WebSocket URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),
}
