//! UseCase: 接続の切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectConnectionUseCase::execute() メソッド
//! - レジストリ・待ち行列・ルームの 3 つからの後始末
//!
//! ### なぜこのテストが必要か
//! - どの状態で切断されても参照が残らないことを保証する
//! - 対戦中の切断で相手に `opponent_disconnected` がちょうど 1 回届くことを確認
//! - 置き換え済みの古い接続の切断が新しい接続を消さないことを確認
//!
//! ### どのような状況を想定しているか
//! - `join` 前の切断、待機中の切断、対戦中の切断
//! - verdict による終了と切断の競合（二重クローズ）

use std::sync::Arc;

use crate::domain::{
    Connection, ConnectionId, ConnectionRegistry, MessagePusher, Room, RoomStore, SessionEvent,
    WaitQueue,
};

use super::arbiter::Arbiter;

/// 切断処理の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisconnectOutcome {
    /// 待ち行列から取り除かれたか
    pub dequeued: bool,
    /// この切断で閉じたルーム
    pub closed_room: Option<Room>,
}

/// 接続切断のユースケース
pub struct DisconnectConnectionUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    queue: Arc<dyn WaitQueue>,
    rooms: Arc<dyn RoomStore>,
    message_pusher: Arc<dyn MessagePusher>,
    arbiter: Arc<Arbiter>,
}

impl DisconnectConnectionUseCase {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        queue: Arc<dyn WaitQueue>,
        rooms: Arc<dyn RoomStore>,
        message_pusher: Arc<dyn MessagePusher>,
        arbiter: Arc<Arbiter>,
    ) -> Self {
        Self {
            registry,
            queue,
            rooms,
            message_pusher,
            arbiter,
        }
    }

    /// トランスポートが閉じた接続の後始末を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 閉じた接続の ID
    /// * `connection` - `join` を完了していればその接続（未完了なら `None`）
    ///
    /// `join` 前の接続でも、待ち行列とルームの後始末は必ず行います。
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        connection: Option<&Connection>,
    ) -> DisconnectOutcome {
        let _guard = self.arbiter.acquire().await;

        if let Some(connection) = connection
            && !self.registry.unregister(connection).await
        {
            tracing::debug!(
                "User '{}' was already superseded, registry left untouched",
                connection.user_id
            );
        }

        let outcome = self.release(&connection_id).await;
        self.message_pusher.unregister_client(&connection_id).await;

        outcome
    }

    /// 接続を待ち行列から外し、占有しているルームを閉じる
    ///
    /// 呼び出し側が `Arbiter` のロックを保持している必要があります。
    pub(crate) async fn release(&self, connection_id: &ConnectionId) -> DisconnectOutcome {
        let dequeued = self.queue.remove(connection_id).await;

        let closed_room = match self.rooms.find_by_connection(connection_id).await {
            Some(room) => self.rooms.close(&room.id).await,
            None => None,
        };

        if let Some(room) = &closed_room
            && let Some(opponent) = room.opponent_of(connection_id)
        {
            tracing::info!(
                "Room '{}' closed by disconnect, notifying '{}'",
                room.id,
                opponent.user_id
            );
            if let Err(e) = self
                .message_pusher
                .push_to(&opponent.id, &SessionEvent::OpponentDisconnected)
                .await
            {
                tracing::warn!("Failed to notify opponent '{}': {}", opponent.user_id, e);
            }
        }

        DisconnectOutcome {
            dequeued,
            closed_room,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::WaitQueue,
        usecase::testing::{Fixture, Received, fixed_provider},
    };

    #[tokio::test]
    async fn test_disconnect_before_join() {
        // テスト項目: join 前の切断でも後始末が完了し、何も残らない
        // given (前提条件):
        let fixture = Fixture::new();
        let client = fixture.open().await;
        let usecase = fixture.disconnect_usecase();

        // when (操作):
        let outcome = usecase.execute(client.id, None).await;

        // then (期待する結果):
        assert_eq!(
            outcome,
            DisconnectOutcome {
                dequeued: false,
                closed_room: None
            }
        );
    }

    #[tokio::test]
    async fn test_disconnect_while_queued() {
        // テスト項目: 待機中の切断でキューとレジストリから取り除かれ、ルームは作られない
        // given (前提条件):
        let fixture = Fixture::new();
        let join = fixture.join_usecase(fixed_provider(1));
        let alice = fixture.open().await;
        let alice_conn = fixture.join(&join, &alice, "alice").await;

        // when (操作):
        let outcome = fixture
            .disconnect_usecase()
            .execute(alice.id, Some(&alice_conn))
            .await;

        // then (期待する結果):
        assert!(outcome.dequeued);
        assert_eq!(outcome.closed_room, None);
        assert_eq!(fixture.queue.count().await, 0);
        assert_eq!(fixture.registry.lookup(&alice_conn.user_id).await, None);
        assert_eq!(fixture.rooms.count().await, 0);
    }

    #[tokio::test]
    async fn test_disconnect_in_room_notifies_opponent_once() {
        // テスト項目: 対戦中の切断で相手に opponent_disconnected が 1 回届き、ルームが消える
        // given (前提条件):
        let fixture = Fixture::new();
        let join = fixture.join_usecase(fixed_provider(1));
        let mut alice = fixture.open().await;
        let mut bob = fixture.open().await;
        let alice_conn = fixture.join(&join, &alice, "alice").await;
        fixture.join(&join, &bob, "bob").await;
        alice.drain();
        bob.drain();

        // when (操作):
        let outcome = fixture
            .disconnect_usecase()
            .execute(alice.id, Some(&alice_conn))
            .await;

        // then (期待する結果):
        let room = outcome.closed_room.expect("room should be closed");
        assert!(room.contains(&alice.id));
        assert_eq!(
            bob.drain(),
            vec![Received::Message(
                crate::infrastructure::dto::websocket::ServerMessage::OpponentDisconnected
            )]
        );
        assert_eq!(fixture.rooms.count().await, 0);
        assert_eq!(fixture.rooms.find_by_connection(&bob.id).await, None);
    }

    #[tokio::test]
    async fn test_second_teardown_of_same_room_is_noop() {
        // テスト項目: 同じルームの後始末が 2 回走っても通知は 1 回だけ
        // given (前提条件):
        let fixture = Fixture::new();
        let join = fixture.join_usecase(fixed_provider(1));
        let alice = fixture.open().await;
        let mut bob = fixture.open().await;
        let alice_conn = fixture.join(&join, &alice, "alice").await;
        let bob_conn = fixture.join(&join, &bob, "bob").await;
        bob.drain();
        let usecase = fixture.disconnect_usecase();

        // when (操作):
        usecase.execute(alice.id, Some(&alice_conn)).await;
        let second = usecase.execute(bob.id, Some(&bob_conn)).await;

        // then (期待する結果):
        assert_eq!(second.closed_room, None);
        assert_eq!(bob.drain().len(), 1);
    }

    #[tokio::test]
    async fn test_stale_disconnect_keeps_new_registration() {
        // テスト項目: 置き換えられた古い接続の切断は新しい接続の登録を消さない
        // given (前提条件):
        let fixture = Fixture::new();
        let join = fixture.join_usecase(fixed_provider(1));
        let old = fixture.open().await;
        let new = fixture.open().await;
        let old_conn = fixture.join(&join, &old, "alice").await;
        let new_conn = fixture.join(&join, &new, "alice").await;

        // when (操作):
        fixture
            .disconnect_usecase()
            .execute(old.id, Some(&old_conn))
            .await;

        // then (期待する結果):
        assert_eq!(
            fixture.registry.lookup(&new_conn.user_id).await,
            Some(new_conn.clone())
        );
        assert_eq!(fixture.queue.snapshot().await, vec![new_conn]);
    }
}
