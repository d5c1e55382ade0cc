//! Interactive duel client.
//!
//! Joins the wait queue under the given user id, prints duel events and sends
//! `submit` / `verdict <VALUE>` commands typed at the prompt.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin arena-client -- --user-id alice
//! cargo run --bin arena-client -- -u ws://127.0.0.1:8000/ws --user-id bob
//! ```

use clap::Parser;

use arena_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "arena-client")]
#[command(about = "Interactive duel client for the Arena matchmaking server", long_about = None)]
struct Args {
    /// User id to join the queue with
    #[arg(short = 'i', long)]
    user_id: String,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8000/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(&["arena_client", env!("CARGO_BIN_NAME")], "info");

    let args = Args::parse();

    if let Err(e) = arena_client::run_client_session(&args.url, &args.user_id).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
