//! Data Transfer Objects (DTOs) for the arena server.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket message DTOs (one JSON object per text frame)
//! - `http`: HTTP API response DTOs

pub mod conversion;
pub mod http;
pub mod websocket;
