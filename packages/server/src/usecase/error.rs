//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::{RepositoryError, RoomError};

/// `join` のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    #[error("connection '{0}' is already waiting for an opponent")]
    AlreadyQueued(String),

    #[error("connection is already in a room")]
    AlreadyInRoom,
}

/// ペアリングのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// 問題カタログが空、または取得がタイムアウトした
    #[error("no problem available, pairing postponed")]
    ProviderUnavailable,

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Room(#[from] RoomError),
}

/// `submission` のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("room not found or not yet assigned")]
    RoomNotFound,

    #[error("not authorized to send data to room '{0}'")]
    Unauthorized(String),
}

/// `verdict` のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerdictError {
    #[error("room not found or not yet assigned")]
    RoomNotFound,
}

/// ルーム詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("invalid room id")]
    InvalidRoomId,

    #[error("room not found")]
    RoomNotFound,
}
