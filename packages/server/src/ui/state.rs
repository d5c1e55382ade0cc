//! Server state and component wiring.

use std::{sync::Arc, time::Duration};

use arena_shared::time::{Clock, SystemClock};

use crate::{
    domain::{ConnectionRegistry, MessagePusher, ProblemProvider, RoomStore, WaitQueue},
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryConnectionRegistry, InMemoryRoomStore, InMemoryWaitQueue},
    },
    usecase::{
        Arbiter, DisconnectConnectionUseCase, GetQueueUseCase, GetRoomDetailUseCase,
        GetRoomsUseCase, JoinQueueUseCase, MatchCoordinator, RelaySubmissionUseCase,
        ReportVerdictUseCase,
    },
};

/// Default timeout applied to each problem lookup
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Default keep-alive ping interval
pub const DEFAULT_KEEPALIVE_INTERVAL: Duration = Duration::from_secs(30);

/// Per-session tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// `None` waits for the catalog indefinitely
    pub lookup_timeout: Option<Duration>,
    /// `None` disables keep-alive pings
    pub keepalive_interval: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            lookup_timeout: Some(DEFAULT_LOOKUP_TIMEOUT),
            keepalive_interval: Some(DEFAULT_KEEPALIVE_INTERVAL),
        }
    }
}

/// Shared application state
pub struct AppState {
    /// JoinQueueUseCase（待ち行列への参加）
    pub join_queue_usecase: Arc<JoinQueueUseCase>,
    /// RelaySubmissionUseCase（提出の中継）
    pub relay_submission_usecase: Arc<RelaySubmissionUseCase>,
    /// ReportVerdictUseCase（判定の報告）
    pub report_verdict_usecase: Arc<ReportVerdictUseCase>,
    /// DisconnectConnectionUseCase（切断の後始末）
    pub disconnect_connection_usecase: Arc<DisconnectConnectionUseCase>,
    /// GetRoomsUseCase（ルーム一覧取得）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（ルーム詳細取得）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    /// GetQueueUseCase（待ち行列取得）
    pub get_queue_usecase: Arc<GetQueueUseCase>,
    /// MessagePusher（接続ごとの送信チャンネルの登録とエラー返信）
    pub message_pusher: Arc<dyn MessagePusher>,
    pub keepalive_interval: Option<Duration>,
}

impl AppState {
    /// Wire the in-memory stores and the WebSocket pusher into every usecase.
    pub fn in_memory(provider: Arc<dyn ProblemProvider>, config: SessionConfig) -> Self {
        // 1. Shared state stores
        let registry: Arc<dyn ConnectionRegistry> = Arc::new(InMemoryConnectionRegistry::new());
        let queue: Arc<dyn WaitQueue> = Arc::new(InMemoryWaitQueue::new());
        let rooms: Arc<dyn RoomStore> = Arc::new(InMemoryRoomStore::new());

        // 2. Outbound delivery, arbitration and clock
        let message_pusher: Arc<dyn MessagePusher> = Arc::new(WebSocketMessagePusher::new());
        let arbiter = Arc::new(Arbiter::new());
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        // 3. Pairing
        let mut coordinator = MatchCoordinator::new(
            registry.clone(),
            queue.clone(),
            rooms.clone(),
            provider,
            message_pusher.clone(),
            arbiter.clone(),
            clock.clone(),
        );
        if let Some(timeout) = config.lookup_timeout {
            coordinator = coordinator.with_lookup_timeout(timeout);
        }

        // 4. Usecases
        let disconnect_connection_usecase = Arc::new(DisconnectConnectionUseCase::new(
            registry.clone(),
            queue.clone(),
            rooms.clone(),
            message_pusher.clone(),
            arbiter.clone(),
        ));
        let join_queue_usecase = Arc::new(JoinQueueUseCase::new(
            registry,
            queue.clone(),
            rooms.clone(),
            message_pusher.clone(),
            Arc::new(coordinator),
            disconnect_connection_usecase.clone(),
            arbiter.clone(),
            clock,
        ));
        let relay_submission_usecase = Arc::new(RelaySubmissionUseCase::new(
            rooms.clone(),
            message_pusher.clone(),
            arbiter.clone(),
        ));
        let report_verdict_usecase = Arc::new(ReportVerdictUseCase::new(
            rooms.clone(),
            message_pusher.clone(),
            arbiter,
        ));

        Self {
            join_queue_usecase,
            relay_submission_usecase,
            report_verdict_usecase,
            disconnect_connection_usecase,
            get_rooms_usecase: Arc::new(GetRoomsUseCase::new(rooms.clone())),
            get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(rooms)),
            get_queue_usecase: Arc::new(GetQueueUseCase::new(queue)),
            message_pusher,
            keepalive_interval: config.keepalive_interval,
        }
    }
}
