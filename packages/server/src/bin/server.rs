//! Duel matchmaking server.
//!
//! Pairs waiting players FIFO, assigns each pair a random problem and relays
//! submission/verdict events between them until one side reports `AC`.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin arena-server -- --problem-id 1 --problem-id 2
//! cargo run --bin arena-server -- --host 0.0.0.0 --port 8000 --problems-file problems.json
//! ```

use std::{path::PathBuf, sync::Arc, time::Duration};

use arena_server::{
    infrastructure::problem_provider::InMemoryProblemCatalog,
    ui::{AppState, Server, SessionConfig},
};
use arena_shared::logger::setup_logger;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "arena-server")]
#[command(about = "Duel matchmaking server over WebSocket", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8000")]
    port: u16,

    /// Problem id available for pairing (repeatable)
    #[arg(long = "problem-id")]
    problem_ids: Vec<i64>,

    /// JSON file holding an array of problem ids
    #[arg(long)]
    problems_file: Option<PathBuf>,

    /// Timeout for one problem lookup in milliseconds (0 waits indefinitely)
    #[arg(long, default_value = "5000")]
    lookup_timeout_ms: u64,

    /// Keep-alive ping interval in seconds (0 disables)
    #[arg(long, default_value = "30")]
    keepalive_secs: u64,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(
        &["arena_server", "arena_shared", env!("CARGO_BIN_NAME")],
        "debug",
    );

    let args = Args::parse();

    // 1. Load the problem catalog
    let mut catalog = match &args.problems_file {
        Some(path) => match InMemoryProblemCatalog::load_from_file(path) {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => InMemoryProblemCatalog::default(),
    };
    catalog.extend(args.problem_ids.iter().copied());
    if catalog.is_empty() {
        tracing::warn!("Problem catalog is empty, players will wait until restart");
    } else {
        tracing::info!("Problem catalog loaded with {} problems", catalog.len());
    }

    // 2. Wire stores, pusher and usecases
    let config = SessionConfig {
        lookup_timeout: non_zero(Duration::from_millis(args.lookup_timeout_ms)),
        keepalive_interval: non_zero(Duration::from_secs(args.keepalive_secs)),
    };
    let state = Arc::new(AppState::in_memory(Arc::new(catalog), config));

    // 3. Create and run the server
    let server = Server::new(state);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

fn non_zero(duration: Duration) -> Option<Duration> {
    (!duration.is_zero()).then_some(duration)
}
