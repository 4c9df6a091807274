//! Puppet CLI client.
//!
//! Logs in, joins a room and sends lines typed on stdin. `@a,b text` addresses
//! the listed members; any other line goes to everyone in the room.
//! Reconnects after a lost connection (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin puppet-client -- --username kevin --room r1
//! cargo run --bin puppet-client -- -u admin --admin -r r1
//! ```

use clap::Parser;

use puppet_client::{ClientConfig, run_client};
use puppet_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "puppet-client")]
#[command(about = "Interactive client for the Puppet room server", long_about = None)]
struct Args {
    /// HTTP base URL of the server
    #[arg(long, default_value = "http://127.0.0.1:8000")]
    url: String,

    /// Username to log in with
    #[arg(short = 'u', long)]
    username: String,

    /// Shared login password
    #[arg(short = 'p', long, default_value = "123456")]
    password: String,

    /// Log in as an administrator
    #[arg(long)]
    admin: bool,

    /// Room to join
    #[arg(short = 'r', long)]
    room: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    let config = ClientConfig {
        url: args.url,
        username: args.username,
        password: args.password,
        admin: args.admin,
        room: args.room,
    };

    // Run the client
    if let Err(e) = run_client(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
