//! WebSocket connection handlers.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{
        Path, Query, State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use serde::Deserialize;
use tokio::task::JoinHandle;

use crate::{
    domain::{ClientConnection, CloseReason, Identity, OutboundFrame, Outbox, RoomId},
    infrastructure::dto::websocket::{InboundMessage, OutgoingMessage},
    ui::state::AppState,
    usecase::{JoinError, LeaveOutcome},
};

/// Upper bound on delivering a close frame to a peer that stopped reading.
const CLOSE_SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// A peer that cannot take a single text frame within this window is dropped.
const TEXT_SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct JoinQuery {
    pub token: Option<String>,
}

/// Authenticate before the upgrade; room admission happens after it.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Query(query): Query<JoinQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let identity = match state
        .join_room_usecase
        .authenticate(query.token.as_deref())
        .await
    {
        Ok(identity) => identity,
        Err(e) => {
            tracing::warn!("Rejecting WebSocket for room '{}': {}", room_id, e);
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, room_id, identity)))
}

fn close_message(reason: CloseReason) -> Message {
    Message::Close(Some(CloseFrame {
        code: reason.code,
        reason: reason.reason.into(),
    }))
}

/// Send a forbidden close on a socket that never joined a room.
async fn reject(mut socket: WebSocket, reason: CloseReason) {
    match tokio::time::timeout(CLOSE_SEND_TIMEOUT, socket.send(close_message(reason))).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::debug!("Failed to send close frame: {}", e),
        Err(_) => tracing::warn!("Timed out sending close frame"),
    }
}

/// Spawns a task that drains the connection's outbox into the WebSocket sender.
///
/// A close request wins over queued and in-flight text. The close frame gets
/// `CLOSE_SEND_TIMEOUT`; after that the task ends and the socket is dropped.
///
/// # Arguments
///
/// * `outbox` - Outbound side of this connection
/// * `sender` - WebSocket sink to send frames to this client
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(mut outbox: Outbox, mut sender: SplitSink<WebSocket, Message>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = outbox.recv().await {
            match frame {
                OutboundFrame::Text(text) => {
                    tokio::select! {
                        biased;
                        reason = outbox.closed() => {
                            send_close(&mut sender, reason).await;
                            break;
                        }
                        sent = tokio::time::timeout(
                            TEXT_SEND_TIMEOUT,
                            sender.send(Message::Text(text.into())),
                        ) => match sent {
                            Ok(Ok(())) => {}
                            Ok(Err(e)) => {
                                tracing::debug!("Failed to send text frame: {}", e);
                                break;
                            }
                            Err(_) => {
                                tracing::warn!("Timed out sending text frame, dropping connection");
                                break;
                            }
                        },
                    }
                }
                OutboundFrame::Close(reason) => {
                    send_close(&mut sender, reason).await;
                    break;
                }
            }
        }
    })
}

async fn send_close(sender: &mut SplitSink<WebSocket, Message>, reason: CloseReason) {
    let code = reason.code;
    match tokio::time::timeout(CLOSE_SEND_TIMEOUT, sender.send(close_message(reason))).await {
        Ok(Ok(())) => tracing::debug!("Sent close frame {}", code),
        Ok(Err(e)) => tracing::debug!("Failed to send close frame {}: {}", code, e),
        Err(_) => tracing::warn!("Timed out sending close frame {}", code),
    }
}

/// Spawns a task that reads frames from this client and routes them to the room.
fn receiver_loop(
    mut receiver: SplitStream<WebSocket>,
    state: Arc<AppState>,
    room_id: RoomId,
    connection: ClientConnection,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::debug!("Room[{}]: WebSocket error: {}", room_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    let inbound = match serde_json::from_str::<InboundMessage>(&text) {
                        Ok(inbound) => inbound,
                        Err(e) => {
                            tracing::warn!(
                                "Room[{}]: dropping malformed frame from '{}': {}",
                                room_id,
                                connection.identity(),
                                e
                            );
                            continue;
                        }
                    };

                    // DTO から Domain Model への変換（送信者は認証済み Identity）
                    let envelope = inbound.into_envelope(connection.identity().clone());
                    let payload = match serde_json::to_string(&OutgoingMessage::from(&envelope)) {
                        Ok(payload) => payload,
                        Err(e) => {
                            tracing::warn!("Room[{}]: failed to encode message: {}", room_id, e);
                            continue;
                        }
                    };

                    let delivered = state
                        .route_message_usecase
                        .execute(&room_id, connection.id(), &envelope, &payload)
                        .await;
                    tracing::debug!(
                        "Room[{}]: '{}' delivered to {} member(s)",
                        room_id,
                        envelope.from,
                        delivered
                    );
                }
                Message::Binary(_) => {
                    tracing::debug!("Room[{}]: ignoring binary frame", room_id);
                }
                Message::Close(_) => {
                    tracing::debug!(
                        "Room[{}]: '{}' requested close",
                        room_id,
                        connection.identity()
                    );
                    break;
                }
                _ => {}
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, room_id: String, identity: Identity) {
    let room_id = match RoomId::try_from(room_id) {
        Ok(room_id) => room_id,
        Err(e) => {
            tracing::warn!("'{}' asked for an invalid room: {}", identity, e);
            reject(socket, CloseReason::room_not_found()).await;
            return;
        }
    };

    let (connection, outbox) = ClientConnection::open(identity.clone());

    match state
        .join_room_usecase
        .execute(&room_id, connection.clone())
        .await
    {
        Ok(outcome) => {
            tracing::debug!(
                "Room[{}]: {} connected (displaced: {})",
                room_id,
                outcome.connected,
                outcome.displaced
            );
        }
        Err(JoinError::RoomNotFound(_)) => {
            tracing::warn!("Room[{}]: '{}' refused, room not found", room_id, identity);
            reject(socket, CloseReason::room_not_found()).await;
            return;
        }
    }

    let (sender, receiver) = socket.split();

    let mut send_task = pusher_loop(outbox, sender);
    let mut recv_task = receiver_loop(receiver, state.clone(), room_id.clone(), connection.clone());

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    connection.mark_closed();

    match state
        .leave_room_usecase
        .execute(&room_id, &identity, connection.id())
        .await
    {
        LeaveOutcome::Left { room_discarded } => {
            tracing::debug!(
                "Room[{}]: '{}' left (room discarded: {})",
                room_id,
                identity,
                room_discarded
            );
        }
        LeaveOutcome::AlreadyGone => {
            tracing::debug!(
                "Room[{}]: '{}' was already removed",
                room_id,
                identity
            );
        }
    }
}
