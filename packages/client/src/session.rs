//! WebSocket client session management.

use std::fmt;

use futures_util::{Sink, SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{Error as WsError, protocol::Message},
};

use puppet_shared::time::now_millis;

use crate::{
    domain::{CloseKind, classify_close, parse_input},
    dto::IncomingFrame,
    error::ClientError,
};

use super::{formatter::MessageFormatter, ui::redisplay_prompt};

/// How a session ended without an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user pressed Ctrl+C / Ctrl+D
    UserExit,
    /// The room was deleted by an administrator
    RoomDeleted,
}

/// Run one WebSocket session in a room
///
/// # Arguments
///
/// * `url` - Room WebSocket URL including the token
/// * `identity` - Name shown in the prompt
/// * `input` - Lines read from the terminal, shared across sessions
pub async fn run_client_session(
    url: &str,
    identity: &str,
    input: &mut mpsc::UnboundedReceiver<String>,
) -> Result<SessionEnd, ClientError> {
    let (ws_stream, _response) = match connect_async(url).await {
        Ok(result) => result,
        Err(WsError::Http(response)) if response.status().as_u16() == 401 => {
            return Err(ClientError::Unauthorized);
        }
        Err(e) => return Err(ClientError::ConnectionError(e.to_string())),
    };

    tracing::info!("Connected to room server");
    println!(
        "\nYou are '{}'. Type a message to send it to everyone, or '@a,b message' to address members. Press Ctrl+C to exit.\n",
        identity
    );

    let (mut write, mut read) = ws_stream.split();

    // Spawn a task to handle incoming messages
    let identity_for_read = identity.to_string();
    let mut read_task = tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let formatted = match serde_json::from_str::<IncomingFrame>(&text) {
                        Ok(frame) => {
                            MessageFormatter::format_message(&frame.from, &frame.data, now_millis())
                        }
                        Err(_) => MessageFormatter::format_raw_message(&text),
                    };
                    print!("{}", formatted);
                    redisplay_prompt(&identity_for_read);
                }
                Ok(Message::Binary(data)) => {
                    print!("{}", MessageFormatter::format_binary_message(data.len()));
                    redisplay_prompt(&identity_for_read);
                }
                Ok(Message::Close(Some(frame))) => {
                    let code = u16::from(frame.code);
                    let reason = frame.reason.as_str().to_string();
                    print!("{}", MessageFormatter::format_closed(code, &reason));

                    return match classify_close(code) {
                        CloseKind::RoomDeleted => Ok(SessionEnd::RoomDeleted),
                        CloseKind::Forbidden => Err(ClientError::RoomNotFound(reason)),
                        CloseKind::Superseded => Err(ClientError::Superseded),
                        CloseKind::Unexpected => Err(ClientError::ConnectionError(format!(
                            "closed with {} - {}",
                            code, reason
                        ))),
                    };
                }
                Ok(Message::Close(None)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                _ => {}
            }
        }

        Err(ClientError::ConnectionError("Connection lost".to_string()))
    });

    // Input lines go to the room until the user exits or the socket fails
    tokio::select! {
        read_result = &mut read_task => {
            read_result.unwrap_or_else(|e| Err(ClientError::ConnectionError(e.to_string())))
        }
        write_result = forward_input(input, &mut write, identity) => {
            read_task.abort();
            write_result
        }
    }
}

/// Send input lines to the room until the input ends or the socket fails.
///
/// The input channel is only borrowed, so lines typed later reach the next
/// session after a reconnect.
async fn forward_input<S>(
    input: &mut mpsc::UnboundedReceiver<String>,
    write: &mut S,
    identity: &str,
) -> Result<SessionEnd, ClientError>
where
    S: Sink<Message> + Unpin,
    S::Error: fmt::Display,
{
    while let Some(line) = input.recv().await {
        let Some(frame) = parse_input(&line) else {
            println!("Usage: <message> | @name1,name2 <message>");
            redisplay_prompt(identity);
            continue;
        };

        let json = match serde_json::to_string(&frame) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize message: {}", e);
                continue;
            }
        };

        if let Err(e) = write.send(Message::Text(json.into())).await {
            tracing::warn!("Failed to send message: {}", e);
            return Err(ClientError::ConnectionError(e.to_string()));
        }

        print!(
            "{}",
            MessageFormatter::format_sent_confirmation(frame.to.as_deref(), now_millis())
        );
        redisplay_prompt(identity);
    }

    // Input closed: say goodbye to the server
    write.send(Message::Close(None)).await.ok();
    Ok(SessionEnd::UserExit)
}
