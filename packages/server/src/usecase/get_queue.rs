//! UseCase: 待ち行列の取得

use std::sync::Arc;

use crate::domain::{Connection, WaitQueue};

/// 対戦待ちの接続を先頭から順に取得するユースケース
pub struct GetQueueUseCase {
    queue: Arc<dyn WaitQueue>,
}

impl GetQueueUseCase {
    pub fn new(queue: Arc<dyn WaitQueue>) -> Self {
        Self { queue }
    }

    pub async fn execute(&self) -> Vec<Connection> {
        self.queue.snapshot().await
    }
}
