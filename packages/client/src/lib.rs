//! Interactive CLI client for the Arena duel server.

pub mod command;
pub mod error;
pub mod formatter;
mod session;
mod ui;

pub use session::run_client_session;
