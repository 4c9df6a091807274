//! Puppet room server.
//!
//! Participants log in over HTTP, join a room over WebSocket and exchange
//! messages with the other members, either broadcast or addressed.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin puppet-server
//! cargo run --bin puppet-server -- --host 0.0.0.0 --port 3000 --password secret
//! ```

use std::sync::Arc;

use clap::Parser;
use puppet_server::{
    infrastructure::repository::{
        InMemoryIdentityStore, InMemoryRoomRegistry, InMemoryUserRepository,
    },
    ui::{AppState, Server},
    usecase::AuthPolicy,
};
use puppet_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "puppet-server")]
#[command(about = "Room membership and message routing server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8000")]
    port: u16,

    /// Shared password accepted for every login
    #[arg(long, default_value = "123456")]
    password: String,

    /// Username prefix required for admin login
    #[arg(long, default_value = "admin")]
    admin_prefix: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repositories
    // 2. UseCases (AppState)
    // 3. Server

    // 1. Create Repositories (in-memory database)
    let identity_store = Arc::new(InMemoryIdentityStore::new());
    let user_repository = Arc::new(InMemoryUserRepository::new());
    let room_registry = Arc::new(InMemoryRoomRegistry::new());

    // 2. Create UseCases
    let policy = AuthPolicy {
        shared_password: args.password,
        admin_prefix: args.admin_prefix,
    };
    let app_state = AppState::new(identity_store, user_repository, room_registry, policy);

    // 3. Create and run the server
    let server = Server::new(Arc::new(app_state));
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
