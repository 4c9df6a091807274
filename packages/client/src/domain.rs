//! Domain logic for client-side operations.
//!
//! Pure functions only, so they can be tested without a server.

use crate::{dto::OutgoingFrame, error::ClientError};

/// Close code sent when an administrator deletes the room
pub const CLOSE_ROOM_DELETED: u16 = 1000;
/// Close code sent when the room does not exist
pub const CLOSE_FORBIDDEN: u16 = 4403;
/// Close code sent to a connection replaced by a newer one
pub const CLOSE_SUPERSEDED: u16 = 4409;

/// How a server-initiated close should end the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseKind {
    RoomDeleted,
    Forbidden,
    Superseded,
    /// Anything else is treated like a lost connection
    Unexpected,
}

pub fn classify_close(code: u16) -> CloseKind {
    match code {
        CLOSE_ROOM_DELETED => CloseKind::RoomDeleted,
        CLOSE_FORBIDDEN => CloseKind::Forbidden,
        CLOSE_SUPERSEDED => CloseKind::Superseded,
        _ => CloseKind::Unexpected,
    }
}

/// Turn one input line into a frame.
///
/// `@a,b text` addresses `a` and `b`; any other line is a broadcast.
/// Returns `None` for a blank line or an address list with no text.
pub fn parse_input(line: &str) -> Option<OutgoingFrame> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let Some(addressed) = line.strip_prefix('@') else {
        return Some(OutgoingFrame {
            to: None,
            data: line.to_string(),
        });
    };

    let (names, text) = addressed.split_once(char::is_whitespace)?;
    let text = text.trim();
    let to: Vec<String> = names
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();

    if to.is_empty() || text.is_empty() {
        return None;
    }

    Some(OutgoingFrame {
        to: Some(to),
        data: text.to_string(),
    })
}

/// Check if the client should exit immediately based on the error type.
///
/// Only a lost connection is worth retrying; every other error would repeat.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    !matches!(error, ClientError::ConnectionError(_))
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    if should_exit_immediately(error) {
        return false;
    }

    current_attempt < max_attempts
}
