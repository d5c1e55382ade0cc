//! UseCase: ペアリング
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - MatchCoordinator::try_pair() メソッド
//! - 待ち行列からの 2 人の取り出し、問題 ID の取得、ルーム作成、`start` 通知
//!
//! ### なぜこのテストが必要か
//! - FIFO の順序でペアリングされることを保証する
//! - 問題 ID が取得できないときに待ち行列の順序が保たれることを確認
//! - 問題 ID の取得中に候補が切断・置き換えされても、
//!   死んだ接続を含むルームが作られないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：2 人目・3 人目の参加
//! - 異常系：カタログが空、取得のタイムアウト
//! - 競合：取得中の切断

use std::{sync::Arc, time::Duration};

use arena_shared::time::Clock;
use tokio::task::JoinHandle;

use crate::domain::{
    Connection, ConnectionRegistry, MessagePusher, ProblemId, ProblemProvider, Room,
    RoomIdFactory, RoomStore, SessionEvent, Timestamp, WaitQueue,
};

use super::{arbiter::Arbiter, error::MatchError};

/// 待ち行列の先頭 2 人を対戦ルームに入れるコーディネーター
pub struct MatchCoordinator {
    registry: Arc<dyn ConnectionRegistry>,
    queue: Arc<dyn WaitQueue>,
    rooms: Arc<dyn RoomStore>,
    provider: Arc<dyn ProblemProvider>,
    message_pusher: Arc<dyn MessagePusher>,
    arbiter: Arc<Arbiter>,
    clock: Arc<dyn Clock>,
    lookup_timeout: Option<Duration>,
}

impl MatchCoordinator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        queue: Arc<dyn WaitQueue>,
        rooms: Arc<dyn RoomStore>,
        provider: Arc<dyn ProblemProvider>,
        message_pusher: Arc<dyn MessagePusher>,
        arbiter: Arc<Arbiter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            queue,
            rooms,
            provider,
            message_pusher,
            arbiter,
            clock,
            lookup_timeout: None,
        }
    }

    /// 問題 ID 取得のタイムアウトを設定（期限切れはカタログが空と同じ扱い）
    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = Some(timeout);
        self
    }

    /// ペアリングをバックグラウンドで起動
    pub fn schedule_pairing(self: &Arc<Self>) -> JoinHandle<Result<Option<Room>, MatchError>> {
        let coordinator = Arc::clone(self);
        tokio::spawn(async move {
            let result = coordinator.try_pair().await;
            if let Err(e) = &result {
                tracing::warn!("Pairing attempt abandoned: {}", e);
            }
            result
        })
    }

    /// 待ち行列の先頭 2 人でルームを作成
    ///
    /// # Returns
    ///
    /// * `Ok(Some(room))` - ルームを作成し、両者に `start` を送信した
    /// * `Ok(None)` - ペアリングできる 2 人がいない
    /// * `Err(MatchError::ProviderUnavailable)` - 問題 ID が得られず、2 人を到着順の位置に戻した
    pub async fn try_pair(&self) -> Result<Option<Room>, MatchError> {
        loop {
            let (first, second) = {
                let _guard = self.arbiter.acquire().await;
                match self.queue.dequeue_pair().await {
                    Some(pair) => pair,
                    None => return Ok(None),
                }
            };

            // 取得中はロックを手放し、2 人はキューの外で保留する
            let problem_id = self.lookup_problem().await;

            let _guard = self.arbiter.acquire().await;

            let mut survivors = Vec::with_capacity(2);
            for candidate in [first, second] {
                if self.registry.is_current(&candidate).await {
                    survivors.push(candidate);
                } else {
                    tracing::debug!(
                        "Candidate '{}' left during problem lookup",
                        candidate.user_id
                    );
                }
            }

            if survivors.len() < 2 {
                self.queue.restore(survivors).await;
                continue;
            }

            let Some(problem_id) = problem_id else {
                self.queue.restore(survivors).await;
                return Err(MatchError::ProviderUnavailable);
            };

            let [first, second]: [Connection; 2] = match survivors.try_into() {
                Ok(pair) => pair,
                Err(_) => continue,
            };

            let room = self.open_room(first, second, problem_id).await?;
            return Ok(Some(room));
        }
    }

    /// 問題 ID を取得（タイムアウトは `None`）
    async fn lookup_problem(&self) -> Option<ProblemId> {
        match self.lookup_timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.provider.random_problem_id())
                .await
                .unwrap_or_else(|_| {
                    tracing::warn!("Problem lookup timed out after {:?}", timeout);
                    None
                }),
            None => self.provider.random_problem_id().await,
        }
    }

    /// ルームを登録し、両者に `start` を送信
    ///
    /// 呼び出し側が `Arbiter` のロックを保持している必要があります。
    async fn open_room(
        &self,
        first: Connection,
        second: Connection,
        problem_id: ProblemId,
    ) -> Result<Room, MatchError> {
        let room = match Room::new(
            RoomIdFactory::generate(),
            first.clone(),
            second.clone(),
            problem_id,
            Timestamp::new(self.clock.now_millis()),
        ) {
            Ok(room) => room,
            Err(e) => {
                self.queue.restore(vec![first, second]).await;
                return Err(e.into());
            }
        };

        if let Err(e) = self.rooms.insert(room.clone()).await {
            self.queue.restore(vec![first, second]).await;
            return Err(e.into());
        }

        tracing::info!(
            "Room '{}' created for '{}' and '{}' (problem {})",
            room.id,
            first.user_id,
            second.user_id,
            room.problem_id
        );

        for (me, opponent) in [(&first, &second), (&second, &first)] {
            let start = SessionEvent::Start {
                room_id: room.id.clone(),
                problem_id: room.problem_id,
                opponent: opponent.user_id.clone(),
            };
            if let Err(e) = self.message_pusher.push_to(&me.id, &start).await {
                tracing::warn!("Failed to send start to '{}': {}", me.user_id, e);
            }
        }

        Ok(room)
    }
}
