//! WebSocket message DTOs.
//!
//! Every frame is a JSON object tagged by its `type` field. Field names on the wire
//! are camelCase (`userId`, `roomId`, `problemId`).

use serde::{Deserialize, Serialize};

/// An identifier that clients may send either as a JSON string or as an integer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Text(String),
    Number(i64),
}

/// Messages sent from a client to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// Enter the wait queue under the given identity
    Join { user_id: WireId },
    /// Tell the opponent a submission was made in the given room
    Submission { room_id: String },
    /// Report the judged outcome of the sender's submission
    Verdict { verdict: String },
}

/// Messages sent from the server to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    Start {
        room_id: String,
        problem_id: i64,
        opponent: String,
    },
    Submission {
        from: String,
    },
    Verdict {
        from: String,
        verdict: String,
    },
    Winner {
        winner: String,
    },
    OpponentDisconnected,
    Error {
        message: String,
    },
    Ping,
}
