//! Client execution logic with reconnection support.

use std::time::Duration;

use super::{
    api::{login, room_url},
    domain::should_attempt_reconnect,
    error::ClientError,
    session::{SessionEnd, run_client_session},
    ui::spawn_line_reader,
};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Where and as whom to connect
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// HTTP base URL of the server
    pub url: String,
    pub username: String,
    pub password: String,
    /// Log in through the admin endpoint
    pub admin: bool,
    pub room: String,
}

/// Log in and join the room, reconnecting after a lost connection.
///
/// A fresh login precedes every attempt, so a token revoked by a newer login
/// elsewhere does not block reconnection. The terminal reader is started once
/// and shared by every session.
pub async fn run_client(config: ClientConfig) -> Result<(), ClientError> {
    let http = reqwest::Client::new();
    let mut input = spawn_line_reader(&config.username);
    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to join room '{}' at {} as '{}' (attempt {}/{})",
            config.room,
            config.url,
            config.username,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        let result: Result<SessionEnd, ClientError> = async {
            let token = login(
                &http,
                &config.url,
                &config.username,
                &config.password,
                config.admin,
            )
            .await?;
            let url = room_url(&config.url, &config.room, &token)?;
            run_client_session(&url, &config.username, &mut input).await
        }
        .await;

        match result {
            Ok(SessionEnd::UserExit) => {
                tracing::info!("Client session ended normally");
                return Ok(());
            }
            Ok(SessionEnd::RoomDeleted) => {
                tracing::info!("Room '{}' was deleted", config.room);
                return Ok(());
            }
            Err(e) => {
                if !should_attempt_reconnect(&e, reconnect_count + 1, MAX_RECONNECT_ATTEMPTS) {
                    tracing::error!("{}", e);
                    return Err(e);
                }

                tracing::warn!("Connection lost: {}", e);
                reconnect_count += 1;

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    reconnect_count + 1,
                    MAX_RECONNECT_ATTEMPTS
                );

                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }
}
