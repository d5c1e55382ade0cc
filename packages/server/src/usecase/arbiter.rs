//! 状態変更の調停

use tokio::sync::{Mutex, MutexGuard};

/// WaitQueue / RoomStore / ConnectionRegistry にまたがる操作を直列化するロック
///
/// 各 UseCase は操作の間このロックを保持します。
/// 問題 ID の取得中だけは `MatchCoordinator` がロックを手放し、
/// 候補の 2 接続はキューの外で保留されます。
#[derive(Debug, Default)]
pub struct Arbiter {
    lock: Mutex<()>,
}

impl Arbiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().await
    }
}
