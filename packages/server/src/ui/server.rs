//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use super::{
    handler::{
        admin_login, create_room, delete_room, get_me, get_room, get_rooms, get_sessions,
        get_users, health_check, home, put_me, user_login, websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Puppet room server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(Arc::new(app_state));
/// server.run("127.0.0.1".to_string(), 8000).await?;
/// ```
pub struct Server {
    app_state: Arc<AppState>,
}

impl Server {
    pub fn new(app_state: Arc<AppState>) -> Self {
        Self { app_state }
    }

    /// Build the router with every HTTP and WebSocket route.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(home))
            .route("/api/health", get(health_check))
            // user API
            .route("/api/user/login", post(user_login))
            .route("/api/user/me", get(get_me).put(put_me))
            // admin API
            .route("/api/admin/login", post(admin_login))
            .route(
                "/api/admin/room/{room_id}",
                get(get_room).post(create_room).delete(delete_room),
            )
            .route("/api/admin/rooms", get(get_rooms))
            .route("/api/admin/users", get(get_users))
            .route("/api/admin/sessions", get(get_sessions))
            // WebSocket
            .route("/ws/room/{room_id}", get(websocket_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(self.app_state.clone())
    }

    /// Run the server until Ctrl+C / SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if binding fails or the server stops abnormally.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();

        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!("Puppet server listening on {}", listener.local_addr()?);
        tracing::info!("Join a room at: ws://{}/ws/room/{{room_id}}?token=...", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
