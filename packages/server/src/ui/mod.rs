//! WebSocket duel server implementation.

mod handler;
mod server;
mod session;
mod signal;
pub mod state;

pub use server::Server;
pub use session::SessionProtocolHandler;
pub use state::{AppState, SessionConfig};
