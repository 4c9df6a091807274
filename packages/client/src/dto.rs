//! Wire types exchanged with the server.

use serde::{Deserialize, Serialize};

/// Response envelope of the HTTP API
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub message: String,
    pub data: Option<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginDto {
    pub username: String,
    pub token: String,
}

/// Frame sent to the room. `to: None` is a broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingFrame {
    pub to: Option<Vec<String>>,
    pub data: String,
}

/// Frame received from the room
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IncomingFrame {
    pub from: String,
    pub data: String,
}
