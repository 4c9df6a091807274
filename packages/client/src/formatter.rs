//! Message formatting utilities for client display.

use puppet_shared::time::timestamp_to_clock_label;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a message received from the room
    ///
    /// # Arguments
    ///
    /// * `from` - Identity of the sender
    /// * `data` - The message body
    /// * `received_at` - Unix timestamp when the message arrived (milliseconds)
    pub fn format_message(from: &str, data: &str, received_at: i64) -> String {
        format!(
            "\n[{}] From [{}]: {}\n",
            timestamp_to_clock_label(received_at),
            from,
            data
        )
    }

    /// Format a confirmation after sending
    pub fn format_sent_confirmation(to: Option<&[String]>, sent_at: i64) -> String {
        let target = match to {
            None => "everyone".to_string(),
            Some(names) => names.join(", "),
        };
        format!(
            "sent to {} at {}\n",
            target,
            timestamp_to_clock_label(sent_at)
        )
    }

    /// Format the notice shown when the server closes the session for good
    pub fn format_closed(code: u16, reason: &str) -> String {
        format!("\nConnection closed by server: {} - {}\n", code, reason)
    }

    /// Format a binary message notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\n← Received {} bytes of binary data\n", byte_count)
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}
