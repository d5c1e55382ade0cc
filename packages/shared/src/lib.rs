//! Utilities shared by the Arena server and client.

pub mod logger;
pub mod time;
