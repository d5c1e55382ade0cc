//! Conversion logic between DTOs and domain entities.

use arena_shared::time::timestamp_to_rfc3339;

use crate::domain::{Connection, Room, RoomStatus, SessionEvent};
use crate::infrastructure::dto::{http, websocket as ws};

// ========================================
// DTO → Domain
// ========================================

impl From<ws::WireId> for String {
    fn from(id: ws::WireId) -> Self {
        match id {
            ws::WireId::Text(text) => text,
            ws::WireId::Number(number) => number.to_string(),
        }
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<&SessionEvent> for ws::ServerMessage {
    fn from(event: &SessionEvent) -> Self {
        match event {
            SessionEvent::Start {
                room_id,
                problem_id,
                opponent,
            } => Self::Start {
                room_id: room_id.as_str().to_string(),
                problem_id: problem_id.value(),
                opponent: opponent.as_str().to_string(),
            },
            SessionEvent::Submission { from } => Self::Submission {
                from: from.as_str().to_string(),
            },
            SessionEvent::Verdict { from, verdict } => Self::Verdict {
                from: from.as_str().to_string(),
                verdict: verdict.as_str().to_string(),
            },
            SessionEvent::Winner { winner } => Self::Winner {
                winner: winner.as_str().to_string(),
            },
            SessionEvent::OpponentDisconnected => Self::OpponentDisconnected,
            SessionEvent::Error { message } => Self::Error {
                message: message.clone(),
            },
            SessionEvent::Ping => Self::Ping,
        }
    }
}

impl From<&Room> for http::RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            problem_id: room.problem_id.value(),
            occupants: room
                .occupants
                .iter()
                .map(|c| c.user_id.as_str().to_string())
                .collect(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}

impl From<&Room> for http::RoomDetailDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            problem_id: room.problem_id.value(),
            status: match room.status {
                RoomStatus::Active => "active",
                RoomStatus::Closed => "closed",
            }
            .to_string(),
            occupants: room
                .occupants
                .iter()
                .map(|c| http::OccupantDto {
                    user_id: c.user_id.as_str().to_string(),
                    joined_at: timestamp_to_rfc3339(c.joined_at.value()),
                })
                .collect(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}

impl http::QueueEntryDto {
    /// Build a queue entry from a waiting connection and its 1-based position
    pub fn from_waiting(position: usize, connection: &Connection) -> Self {
        Self {
            position,
            user_id: connection.user_id.as_str().to_string(),
            joined_at: timestamp_to_rfc3339(connection.joined_at.value()),
        }
    }
}
