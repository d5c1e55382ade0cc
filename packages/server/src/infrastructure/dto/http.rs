//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Room list entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub id: String,
    pub problem_id: i64,
    /// Occupant user ids
    pub occupants: Vec<String>,
    /// RFC 3339
    pub created_at: String,
}

/// Room detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetailDto {
    pub id: String,
    pub problem_id: i64,
    pub status: String,
    pub occupants: Vec<OccupantDto>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupantDto {
    pub user_id: String,
    pub joined_at: String,
}

/// Wait queue entry, in FIFO order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntryDto {
    pub position: usize,
    pub user_id: String,
    pub joined_at: String,
}
