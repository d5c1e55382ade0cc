//! UseCase テスト用の共通フィクスチャ
//!
//! 実際のインメモリ実装と `WebSocketMessagePusher` を組み合わせ、
//! 各接続に届いたフレームをチャンネルから取り出して検証します。

use std::sync::Arc;

use arena_shared::time::{Clock, FixedClock};
use tokio::sync::{Notify, Semaphore, mpsc};

use crate::{
    domain::{
        Connection, ConnectionId, MessagePusher, MockProblemProvider, ProblemId, ProblemProvider,
        PushFrame, UserId,
    },
    infrastructure::{
        dto::websocket::ServerMessage,
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryConnectionRegistry, InMemoryRoomStore, InMemoryWaitQueue},
    },
};

use super::{
    arbiter::Arbiter, disconnect_connection::DisconnectConnectionUseCase,
    join_queue::JoinQueueUseCase, match_coordinator::MatchCoordinator,
};

/// 接続に届いたフレーム
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Received {
    Message(ServerMessage),
    Close,
}

/// テスト用の接続（送信チャンネルの受信側を持つ）
pub struct TestClient {
    pub id: ConnectionId,
    rx: mpsc::UnboundedReceiver<PushFrame>,
}

impl TestClient {
    /// これまでに届いたフレームをすべて取り出す
    pub fn drain(&mut self) -> Vec<Received> {
        let mut received = Vec::new();
        while let Ok(frame) = self.rx.try_recv() {
            received.push(match frame {
                PushFrame::Text(text) => Received::Message(
                    serde_json::from_str(&text).expect("pushed frame should be a ServerMessage"),
                ),
                PushFrame::Close => Received::Close,
            });
        }
        received
    }
}

pub struct Fixture {
    pub registry: Arc<InMemoryConnectionRegistry>,
    pub queue: Arc<InMemoryWaitQueue>,
    pub rooms: Arc<InMemoryRoomStore>,
    pub message_pusher: Arc<WebSocketMessagePusher>,
    pub arbiter: Arc<Arbiter>,
    pub clock: Arc<dyn Clock>,
}

impl Fixture {
    /// テスト用の固定時刻
    pub const NOW: i64 = 1_700_000_000_000;

    pub fn new() -> Self {
        Self {
            registry: Arc::new(InMemoryConnectionRegistry::new()),
            queue: Arc::new(InMemoryWaitQueue::new()),
            rooms: Arc::new(InMemoryRoomStore::new()),
            message_pusher: Arc::new(WebSocketMessagePusher::new()),
            arbiter: Arc::new(Arbiter::new()),
            clock: Arc::new(FixedClock::new(Self::NOW)),
        }
    }

    /// 接続を開き、送信チャンネルを登録する
    pub async fn open(&self) -> TestClient {
        let id = ConnectionId::generate();
        let (tx, rx) = mpsc::unbounded_channel();
        self.message_pusher.register_client(id, tx).await;
        TestClient { id, rx }
    }

    pub fn disconnect_usecase(&self) -> Arc<DisconnectConnectionUseCase> {
        Arc::new(DisconnectConnectionUseCase::new(
            self.registry.clone(),
            self.queue.clone(),
            self.rooms.clone(),
            self.message_pusher.clone(),
            self.arbiter.clone(),
        ))
    }

    pub fn coordinator(&self, provider: Arc<dyn ProblemProvider>) -> MatchCoordinator {
        MatchCoordinator::new(
            self.registry.clone(),
            self.queue.clone(),
            self.rooms.clone(),
            provider,
            self.message_pusher.clone(),
            self.arbiter.clone(),
            self.clock.clone(),
        )
    }

    pub fn join_usecase(&self, provider: Arc<dyn ProblemProvider>) -> JoinQueueUseCase {
        self.join_usecase_with(Arc::new(self.coordinator(provider)))
    }

    pub fn join_usecase_with(&self, coordinator: Arc<MatchCoordinator>) -> JoinQueueUseCase {
        JoinQueueUseCase::new(
            self.registry.clone(),
            self.queue.clone(),
            self.rooms.clone(),
            self.message_pusher.clone(),
            coordinator,
            self.disconnect_usecase(),
            self.arbiter.clone(),
            self.clock.clone(),
        )
    }

    /// `join` を実行し、起動したペアリングの完了まで待つ
    pub async fn join(
        &self,
        usecase: &JoinQueueUseCase,
        client: &TestClient,
        name: &str,
    ) -> Connection {
        let outcome = usecase
            .execute(client.id, UserId::new(name.to_string()).unwrap())
            .await
            .expect("join should succeed");
        outcome
            .pairing
            .await
            .expect("pairing task should not panic")
            .expect("pairing should succeed");
        outcome.connection
    }
}

/// 常に同じ問題 ID を返すプロバイダー
pub fn fixed_provider(problem_id: i64) -> Arc<dyn ProblemProvider> {
    let mut provider = MockProblemProvider::new();
    provider
        .expect_random_problem_id()
        .returning(move || Some(ProblemId::new(problem_id)));
    Arc::new(provider)
}

/// カタログが空のプロバイダー
pub fn empty_provider() -> Arc<dyn ProblemProvider> {
    let mut provider = MockProblemProvider::new();
    provider.expect_random_problem_id().returning(|| None);
    Arc::new(provider)
}

/// `release` されるまで応答しないプロバイダー
///
/// 問題 ID の取得中に起きる出来事を再現するために使います。
pub struct GatedProvider {
    problem_id: i64,
    entered: Notify,
    gate: Semaphore,
}

impl GatedProvider {
    pub fn new(problem_id: i64) -> Self {
        Self {
            problem_id,
            entered: Notify::new(),
            gate: Semaphore::new(0),
        }
    }

    /// 取得が始まるまで待つ
    pub async fn wait_until_entered(&self) {
        self.entered.notified().await;
    }

    /// 以後の取得をすべて通す
    pub fn release(&self) {
        self.gate.add_permits(1);
    }
}

#[async_trait::async_trait]
impl ProblemProvider for GatedProvider {
    async fn random_problem_id(&self) -> Option<ProblemId> {
        self.entered.notify_one();
        let _permit = self.gate.acquire().await.ok()?;
        Some(ProblemId::new(self.problem_id))
    }
}
