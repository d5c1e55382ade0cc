//! UseCase: 提出の中継（`submission`）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelaySubmissionUseCase::execute() メソッド
//! - 相手だけに `submission` が届くこと
//!
//! ### なぜこのテストが必要か
//! - 送信者自身や無関係の接続に中継されないことを保証する
//! - 別のルーム ID を名乗った場合に中継されないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：対戦中の中継
//! - 異常系：ルーム未割り当て、ルーム ID の不一致

use std::sync::Arc;

use crate::domain::{Connection, ConnectionId, MessagePusher, RoomStore, SessionEvent};

use super::{arbiter::Arbiter, error::SubmissionError};

/// 提出中継のユースケース
pub struct RelaySubmissionUseCase {
    rooms: Arc<dyn RoomStore>,
    message_pusher: Arc<dyn MessagePusher>,
    arbiter: Arc<Arbiter>,
}

impl RelaySubmissionUseCase {
    pub fn new(
        rooms: Arc<dyn RoomStore>,
        message_pusher: Arc<dyn MessagePusher>,
        arbiter: Arc<Arbiter>,
    ) -> Self {
        Self {
            rooms,
            message_pusher,
            arbiter,
        }
    }

    /// 提出を相手に中継
    ///
    /// # Arguments
    ///
    /// * `sender` - 提出した接続
    /// * `claimed_room_id` - メッセージに書かれていたルーム ID
    ///
    /// # Returns
    ///
    /// * `Ok(ConnectionId)` - 中継先（相手）の接続 ID
    /// * `Err(SubmissionError)` - ルームが無い、またはルーム ID が一致しない
    pub async fn execute(
        &self,
        sender: &Connection,
        claimed_room_id: &str,
    ) -> Result<ConnectionId, SubmissionError> {
        let _guard = self.arbiter.acquire().await;

        let room = self
            .rooms
            .find_by_connection(&sender.id)
            .await
            .ok_or(SubmissionError::RoomNotFound)?;

        if room.id.as_str() != claimed_room_id {
            tracing::warn!(
                "User '{}' claimed room '{}' but is seated in '{}'",
                sender.user_id,
                claimed_room_id,
                room.id
            );
            return Err(SubmissionError::Unauthorized(claimed_room_id.to_string()));
        }

        let opponent = room
            .opponent_of(&sender.id)
            .ok_or(SubmissionError::RoomNotFound)?;

        let event = SessionEvent::Submission {
            from: sender.user_id.clone(),
        };
        if let Err(e) = self.message_pusher.push_to(&opponent.id, &event).await {
            tracing::warn!("Failed to relay submission to '{}': {}", opponent.user_id, e);
        }

        Ok(opponent.id)
    }
}
