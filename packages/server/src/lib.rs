//! Arena duel matchmaking server.
//!
//! Layers, from the inside out:
//! - `domain`: entities, value objects and the interfaces the usecases depend on
//! - `usecase`: join, pairing, relaying, verdicts, teardown and read-only queries
//! - `infrastructure`: in-memory stores, the WebSocket pusher, the problem catalog and DTOs
//! - `ui`: the axum router, WebSocket/HTTP handlers and the per-connection protocol

pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
