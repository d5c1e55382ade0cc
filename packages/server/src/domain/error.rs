//! ドメイン層のエラー型

use thiserror::Error;

/// 値オブジェクト生成時のバリデーションエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("user id must not be empty")]
    EmptyUserId,

    #[error("room id must not be empty")]
    EmptyRoomId,
}

/// Room エンティティの不変条件違反
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    /// 2 人の占有者が同一の接続またはユーザー
    #[error("a room needs two distinct occupants, got '{0}' twice")]
    SameOccupant(String),
}

/// Repository 操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// 既に待ち行列に入っている接続を再度追加しようとした
    #[error("connection '{0}' is already queued")]
    AlreadyQueued(String),

    /// 同じ ID のルームが既に存在する
    #[error("room '{0}' already exists")]
    DuplicateRoomId(String),
}

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("connection '{0}' is not registered")]
    ConnectionNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),
}
