//! UseCase: 判定の報告（`verdict`）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ReportVerdictUseCase::execute() メソッド
//! - 判定の中継と、`AC` による対戦の終了
//!
//! ### なぜこのテストが必要か
//! - `AC` 以外ではルームが続くことを保証する
//! - `AC` で `verdict` → `winner` の順に届き、両者のトランスポートが閉じ、
//!   ルームが消えることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：`WA` の中継、`AC` による終了
//! - 異常系：ルームが無い（相手の切断後など）

use std::sync::Arc;

use crate::domain::{Connection, MessagePusher, Room, RoomStore, SessionEvent, Verdict};

use super::{arbiter::Arbiter, error::VerdictError};

/// 判定報告の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerdictOutcome {
    /// 判定を中継し、対戦は続く
    Continued,
    /// `AC` により対戦が終了し、ルームを閉じた
    Finished { room: Room },
}

/// 判定報告のユースケース
pub struct ReportVerdictUseCase {
    rooms: Arc<dyn RoomStore>,
    message_pusher: Arc<dyn MessagePusher>,
    arbiter: Arc<Arbiter>,
}

impl ReportVerdictUseCase {
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

    /// 判定を相手に中継し、`AC` なら対戦を終了する
    ///
    /// # Returns
    ///
    /// * `Ok(VerdictOutcome)` - 中継した（`AC` なら終了した）
    /// * `Err(VerdictError::RoomNotFound)` - 対戦中のルームが無い
    pub async fn execute(
        &self,
        sender: &Connection,
        verdict: Verdict,
    ) -> Result<VerdictOutcome, VerdictError> {
        let _guard = self.arbiter.acquire().await;

        let room = self
            .rooms
            .find_by_connection(&sender.id)
            .await
            .ok_or(VerdictError::RoomNotFound)?;
        let opponent = room
            .opponent_of(&sender.id)
            .ok_or(VerdictError::RoomNotFound)?;

        let accepted = verdict.is_accepted();
        let event = SessionEvent::Verdict {
            from: sender.user_id.clone(),
            verdict,
        };
        if let Err(e) = self.message_pusher.push_to(&opponent.id, &event).await {
            tracing::warn!("Failed to relay verdict to '{}': {}", opponent.user_id, e);
        }

        if !accepted {
            return Ok(VerdictOutcome::Continued);
        }

        let Some(room) = self.rooms.close(&room.id).await else {
            return Err(VerdictError::RoomNotFound);
        };

        tracing::info!("User '{}' won room '{}'", sender.user_id, room.id);

        let winner = SessionEvent::Winner {
            winner: sender.user_id.clone(),
        };
        let targets = room.occupant_ids();
        if let Err(e) = self.message_pusher.broadcast(targets.to_vec(), &winner).await {
            tracing::warn!("Failed to announce winner of room '{}': {}", room.id, e);
        }
        for target in &targets {
            if let Err(e) = self.message_pusher.close(target).await {
                tracing::debug!("Transport already gone for '{}': {}", target, e);
            }
        }

        Ok(VerdictOutcome::Finished { room })
    }
}
