//! InMemory WaitQueue 実装
//!
//! 各接続に追加時の通し番号を付け、取り出した接続は番号の位置に戻します。
//! 取り出し中の接続の番号は `held` に残し、`restore` か `remove` で破棄します。

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Connection, ConnectionId, RepositoryError, WaitQueue};

struct Entry {
    seq: u64,
    connection: Connection,
}

#[derive(Default)]
struct QueueTable {
    /// 通し番号の昇順
    entries: VecDeque<Entry>,
    /// 取り出し中の接続の通し番号
    held: HashMap<ConnectionId, u64>,
    next_seq: u64,
}

impl QueueTable {
    fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.entries.iter().any(|e| &e.connection.id == connection_id)
    }
}

/// インメモリ WaitQueue 実装（厳密な FIFO）
#[derive(Default)]
pub struct InMemoryWaitQueue {
    table: Mutex<QueueTable>,
}

impl InMemoryWaitQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WaitQueue for InMemoryWaitQueue {
    async fn enqueue(&self, connection: Connection) -> Result<(), RepositoryError> {
        let mut table = self.table.lock().await;
        if table.contains(&connection.id) || table.held.contains_key(&connection.id) {
            return Err(RepositoryError::AlreadyQueued(connection.id.to_string()));
        }
        let seq = table.next_seq;
        table.next_seq += 1;
        table.entries.push_back(Entry { seq, connection });
        Ok(())
    }

    async fn dequeue_pair(&self) -> Option<(Connection, Connection)> {
        let mut table = self.table.lock().await;
        if table.entries.len() < 2 {
            return None;
        }
        let first = table.entries.pop_front()?;
        let second = table.entries.pop_front()?;
        for entry in [&first, &second] {
            table.held.insert(entry.connection.id, entry.seq);
        }
        Some((first.connection, second.connection))
    }

    async fn restore(&self, connections: Vec<Connection>) {
        let mut table = self.table.lock().await;
        for connection in connections {
            if table.contains(&connection.id) {
                continue;
            }
            // 番号の記録が無い接続は先頭へ
            let seq = table.held.remove(&connection.id).unwrap_or(0);
            let position = table.entries.partition_point(|e| e.seq < seq);
            table.entries.insert(position, Entry { seq, connection });
        }
    }

    async fn remove(&self, connection_id: &ConnectionId) -> bool {
        let mut table = self.table.lock().await;
        table.held.remove(connection_id);
        let before = table.entries.len();
        table.entries.retain(|e| &e.connection.id != connection_id);
        table.entries.len() != before
    }

    async fn snapshot(&self) -> Vec<Connection> {
        let table = self.table.lock().await;
        table.entries.iter().map(|e| e.connection.clone()).collect()
    }

    async fn count(&self) -> usize {
        let table = self.table.lock().await;
        table.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::repository::inmemory::fixtures::connection;

    #[tokio::test]
    async fn test_dequeue_pair_in_arrival_order() {
        // テスト項目: 先に入った 2 接続が到着順に取り出される
        // given (前提条件):
        let queue = InMemoryWaitQueue::new();
        let (u1, u2, u3) = (connection("u1"), connection("u2"), connection("u3"));
        for c in [&u1, &u2, &u3] {
            queue.enqueue(c.clone()).await.unwrap();
        }

        // when (操作):
        let pair = queue.dequeue_pair().await;

        // then (期待する結果):
        assert_eq!(pair, Some((u1, u2)));
        assert_eq!(queue.snapshot().await, vec![u3]);
    }

    #[tokio::test]
    async fn test_dequeue_pair_with_single_entry_leaves_queue_unchanged() {
        // テスト項目: 1 接続しかない場合は None で、キューは変わらない
        let queue = InMemoryWaitQueue::new();
        let u1 = connection("u1");
        queue.enqueue(u1.clone()).await.unwrap();

        assert_eq!(queue.dequeue_pair().await, None);
        assert_eq!(queue.snapshot().await, vec![u1]);
    }

    #[tokio::test]
    async fn test_enqueue_rejects_duplicate_connection() {
        // テスト項目: 同じ接続を二重に追加するとエラーになる
        let queue = InMemoryWaitQueue::new();
        let u1 = connection("u1");
        queue.enqueue(u1.clone()).await.unwrap();

        let result = queue.enqueue(u1.clone()).await;

        assert_eq!(
            result,
            Err(RepositoryError::AlreadyQueued(u1.id.to_string()))
        );
        assert_eq!(queue.count().await, 1);
    }

    #[tokio::test]
    async fn test_enqueue_rejects_held_connection() {
        // テスト項目: 取り出し中の接続は再追加できない
        let queue = InMemoryWaitQueue::new();
        let (u1, u2) = (connection("u1"), connection("u2"));
        queue.enqueue(u1.clone()).await.unwrap();
        queue.enqueue(u2.clone()).await.unwrap();
        queue.dequeue_pair().await.unwrap();

        let result = queue.enqueue(u1.clone()).await;

        assert_eq!(
            result,
            Err(RepositoryError::AlreadyQueued(u1.id.to_string()))
        );
        assert_eq!(queue.count().await, 0);
    }

    #[tokio::test]
    async fn test_restore_puts_pair_ahead_of_later_arrivals() {
        // テスト項目: 戻した接続は後から来た接続より前に、元の順序で並ぶ
        // given (前提条件):
        let queue = InMemoryWaitQueue::new();
        let (u1, u2, u3) = (connection("u1"), connection("u2"), connection("u3"));
        queue.enqueue(u1.clone()).await.unwrap();
        queue.enqueue(u2.clone()).await.unwrap();
        let (first, second) = queue.dequeue_pair().await.unwrap();
        queue.enqueue(u3.clone()).await.unwrap();

        // when (操作):
        queue.restore(vec![first, second]).await;

        // then (期待する結果):
        assert_eq!(queue.snapshot().await, vec![u1, u2, u3]);
    }

    #[tokio::test]
    async fn test_restore_of_two_held_pairs_keeps_arrival_order() {
        // テスト項目: 2 組を同時に取り出し、後の組から先に戻しても到着順に並ぶ
        // given (前提条件):
        let queue = InMemoryWaitQueue::new();
        let users: Vec<Connection> = ["u1", "u2", "u3", "u4", "u5"]
            .into_iter()
            .map(connection)
            .collect();
        for c in &users[..4] {
            queue.enqueue(c.clone()).await.unwrap();
        }
        let (a1, a2) = queue.dequeue_pair().await.unwrap();
        let (b1, b2) = queue.dequeue_pair().await.unwrap();
        queue.enqueue(users[4].clone()).await.unwrap();

        // when (操作):
        queue.restore(vec![b1, b2]).await;
        queue.restore(vec![a1, a2]).await;

        // then (期待する結果):
        assert_eq!(queue.snapshot().await, users);
    }

    #[tokio::test]
    async fn test_restore_single_survivor_keeps_arrival_order() {
        // テスト項目: 片方だけ戻した場合も、その接続は後から来た接続より前に並ぶ
        // given (前提条件):
        let queue = InMemoryWaitQueue::new();
        let (u1, u2, u3) = (connection("u1"), connection("u2"), connection("u3"));
        queue.enqueue(u1.clone()).await.unwrap();
        queue.enqueue(u2.clone()).await.unwrap();
        let (first, second) = queue.dequeue_pair().await.unwrap();
        queue.enqueue(u3.clone()).await.unwrap();

        // when (操作):
        // u1 は取り出し中に切断した
        queue.remove(&first.id).await;
        queue.restore(vec![second]).await;

        // then (期待する結果):
        assert_eq!(queue.snapshot().await, vec![u2, u3]);
        assert!(queue.enqueue(u1).await.is_ok());
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        // テスト項目: remove は冪等で、存在しない接続の削除は false を返す
        let queue = InMemoryWaitQueue::new();
        let u1 = connection("u1");
        queue.enqueue(u1.clone()).await.unwrap();

        assert!(queue.remove(&u1.id).await);
        assert!(!queue.remove(&u1.id).await);
        assert_eq!(queue.count().await, 0);
    }
}
