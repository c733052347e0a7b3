//! Room coordinator server.
//!
//! Groups WebSocket connections into rooms, keeps each room's chat history and
//! relays WebRTC signaling between members.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin meetroom-server
//! cargo run --bin meetroom-server -- --host 127.0.0.1 --port 8080 --history-limit 200
//! ```

use clap::Parser;
use meetroom_server::app::{AppConfig, build_server};
use meetroom_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "meetroom-server")]
#[command(about = "Room coordinator for peer-to-peer meetings", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "3000")]
    port: u16,

    /// Keep only the N most recent chat messages per room
    #[arg(long, value_name = "N")]
    history_limit: Option<usize>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    let config = AppConfig {
        history_limit: args.history_limit,
    };
    let server = build_server(&config);

    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
