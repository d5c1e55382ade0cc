//! UseCase: 待ち行列への参加（`join`）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinQueueUseCase::execute() メソッド
//! - レジストリへの登録、待ち行列への追加、ペアリングの起動
//!
//! ### なぜこのテストが必要か
//! - 1 ユーザー ID あたり 1 接続という不変条件を保証する
//! - 重複 ID の扱い（evict-and-replace）を固定する
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規ユーザーの参加
//! - 重複系：同じユーザー ID の別接続からの参加（待機中・対戦中）
//! - 異常系：同じ接続の二重参加

use std::sync::Arc;

use arena_shared::time::Clock;
use tokio::task::JoinHandle;

use crate::domain::{
    Connection, ConnectionId, ConnectionRegistry, MessagePusher, Room, RoomStore, SessionEvent,
    Timestamp, UserId, WaitQueue,
};

use super::{
    arbiter::Arbiter, disconnect_connection::DisconnectConnectionUseCase, error::JoinError,
    error::MatchError, match_coordinator::MatchCoordinator,
};

/// 置き換えられた古い接続に送るメッセージ
pub const DUPLICATE_CONNECTION_MESSAGE: &str = "duplicate connection, closing the previous one";

/// `join` の結果
pub struct JoinOutcome {
    /// 登録された接続
    pub connection: Connection,
    /// 置き換えられた同じユーザー ID の古い接続
    pub superseded: Option<Connection>,
    /// 起動したペアリング処理
    ///
    /// 待たずに捨てても処理は継続します。
    pub pairing: JoinHandle<Result<Option<Room>, MatchError>>,
}

/// `join` のユースケース
pub struct JoinQueueUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    queue: Arc<dyn WaitQueue>,
    rooms: Arc<dyn RoomStore>,
    message_pusher: Arc<dyn MessagePusher>,
    coordinator: Arc<MatchCoordinator>,
    disconnect: Arc<DisconnectConnectionUseCase>,
    arbiter: Arc<Arbiter>,
    clock: Arc<dyn Clock>,
}

impl JoinQueueUseCase {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        queue: Arc<dyn WaitQueue>,
        rooms: Arc<dyn RoomStore>,
        message_pusher: Arc<dyn MessagePusher>,
        coordinator: Arc<MatchCoordinator>,
        disconnect: Arc<DisconnectConnectionUseCase>,
        arbiter: Arc<Arbiter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            queue,
            rooms,
            message_pusher,
            coordinator,
            disconnect,
            arbiter,
            clock,
        }
    }

    /// `join` を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 参加する接続の ID
    /// * `user_id` - 接続が名乗るユーザー ID
    ///
    /// # Returns
    ///
    /// * `Ok(JoinOutcome)` - 待ち行列に追加され、ペアリングが起動された
    /// * `Err(JoinError)` - 既に待機中または対戦中（状態は変更しない）
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        user_id: UserId,
    ) -> Result<JoinOutcome, JoinError> {
        let (connection, superseded) = {
            let _guard = self.arbiter.acquire().await;

            if self.rooms.find_by_connection(&connection_id).await.is_some() {
                return Err(JoinError::AlreadyInRoom);
            }

            let connection = Connection::new(
                connection_id,
                user_id,
                Timestamp::new(self.clock.now_millis()),
            );

            // 1. 待ち行列に追加（失敗した場合は何も変更していない）
            self.queue
                .enqueue(connection.clone())
                .await
                .map_err(|_| JoinError::AlreadyQueued(connection_id.to_string()))?;

            // 2. レジストリに登録し、同じユーザー ID の古い接続があれば追い出す
            let superseded = self.registry.register(connection.clone()).await;
            if let Some(old) = &superseded {
                self.evict(old).await;
            }

            (connection, superseded)
        };

        tracing::info!("User '{}' joined the queue", connection.user_id);

        // 3. ペアリングを起動
        let pairing = self.coordinator.schedule_pairing();

        Ok(JoinOutcome {
            connection,
            superseded,
            pairing,
        })
    }

    /// 置き換えられた接続を待ち行列・ルームから外し、トランスポートを閉じる
    ///
    /// 古い接続のトランスポートが後で閉じたときの後始末は、すべて何もしない操作になります。
    async fn evict(&self, old: &Connection) {
        tracing::warn!(
            "Duplicate connection for user '{}', closing the previous one",
            old.user_id
        );

        self.disconnect.release(&old.id).await;

        let notice = SessionEvent::Error {
            message: DUPLICATE_CONNECTION_MESSAGE.to_string(),
        };
        if let Err(e) = self.message_pusher.push_to(&old.id, &notice).await {
            tracing::debug!("Could not notify superseded connection: {}", e);
        }
        if let Err(e) = self.message_pusher.close(&old.id).await {
            tracing::debug!("Could not close superseded connection: {}", e);
        }
    }
}
