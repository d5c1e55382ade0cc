//! Error types for the duel client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Outbound message could not be encoded
    #[error("Failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors raised while reading a command line
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}' (try: submit, verdict <VALUE>, quit)")]
    Unknown(String),

    #[error("usage: verdict <VALUE>")]
    MissingVerdict,
}
