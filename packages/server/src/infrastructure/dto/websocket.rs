//! WebSocket frame DTOs.

use serde::{Deserialize, Serialize};

/// The `to` field of an inbound frame.
///
/// A list is the documented shape. A bare string is accepted for older clients:
/// an empty string means broadcast, anything else a single recipient.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RecipientField {
    List(Vec<String>),
    Single(String),
}

/// Inbound frame: `{ "to": [identity, ...] | null, "data": string }`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InboundMessage {
    #[serde(default)]
    pub to: Option<RecipientField>,
    pub data: String,
}

/// Outbound frame: `{ "from": identity, "data": string }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub from: String,
    pub data: String,
}
