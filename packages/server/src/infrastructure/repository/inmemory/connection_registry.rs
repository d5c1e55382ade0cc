//! InMemory ConnectionRegistry 実装

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Connection, ConnectionRegistry, UserId};

/// インメモリ ConnectionRegistry 実装
///
/// Key: ユーザー ID / Value: そのユーザーの現在の接続
#[derive(Default)]
pub struct InMemoryConnectionRegistry {
    connections: Mutex<HashMap<UserId, Connection>>,
}

impl InMemoryConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn register(&self, connection: Connection) -> Option<Connection> {
        let mut connections = self.connections.lock().await;
        let user_id = connection.user_id.clone();
        let previous = connections.insert(user_id, connection.clone());

        // 同じ接続の再登録は置き換えとみなさない
        previous.filter(|prev| prev.id != connection.id)
    }

    async fn unregister(&self, connection: &Connection) -> bool {
        let mut connections = self.connections.lock().await;
        match connections.get(&connection.user_id) {
            Some(current) if current.id == connection.id => {
                connections.remove(&connection.user_id);
                tracing::debug!("User '{}' unregistered", connection.user_id);
                true
            }
            _ => false,
        }
    }

    async fn lookup(&self, user_id: &UserId) -> Option<Connection> {
        let connections = self.connections.lock().await;
        connections.get(user_id).cloned()
    }

    async fn count(&self) -> usize {
        let connections = self.connections.lock().await;
        connections.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::repository::inmemory::fixtures::connection;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - 登録・参照・登録解除
    // - 同一ユーザー ID の再登録（evict-and-replace）
    // - 古い接続の登録解除が新しい接続を消さないこと
    // ========================================

    #[tokio::test]
    async fn test_register_and_lookup() {
        // テスト項目: 登録した接続をユーザー ID で参照できる
        // given (前提条件):
        let registry = InMemoryConnectionRegistry::new();
        let alice = connection("alice");

        // when (操作):
        let evicted = registry.register(alice.clone()).await;

        // then (期待する結果):
        assert_eq!(evicted, None);
        assert_eq!(registry.lookup(&alice.user_id).await, Some(alice.clone()));
        assert!(registry.is_current(&alice).await);
        assert_eq!(registry.count().await, 1);
    }

    #[tokio::test]
    async fn test_register_same_identity_evicts_previous() {
        // テスト項目: 同じユーザー ID で登録すると古い接続が置き換えられて返される
        // given (前提条件):
        let registry = InMemoryConnectionRegistry::new();
        let old = connection("alice");
        registry.register(old.clone()).await;

        // when (操作):
        let new = connection("alice");
        let evicted = registry.register(new.clone()).await;

        // then (期待する結果):
        assert_eq!(evicted, Some(old.clone()));
        assert_eq!(registry.lookup(&new.user_id).await, Some(new.clone()));
        assert!(!registry.is_current(&old).await);
        assert_eq!(registry.count().await, 1);
    }

    #[tokio::test]
    async fn test_register_same_connection_twice_is_not_eviction() {
        // テスト項目: 同じ接続の再登録は置き換えとして扱われない
        let registry = InMemoryConnectionRegistry::new();
        let alice = connection("alice");
        registry.register(alice.clone()).await;

        assert_eq!(registry.register(alice).await, None);
    }

    #[tokio::test]
    async fn test_stale_unregister_keeps_newer_connection() {
        // テスト項目: 置き換え済みの古い接続の登録解除は新しい接続を消さない
        // given (前提条件):
        let registry = InMemoryConnectionRegistry::new();
        let old = connection("alice");
        let new = connection("alice");
        registry.register(old.clone()).await;
        registry.register(new.clone()).await;

        // when (操作):
        let removed = registry.unregister(&old).await;

        // then (期待する結果):
        assert!(!removed);
        assert_eq!(registry.lookup(&new.user_id).await, Some(new));
    }

    #[tokio::test]
    async fn test_unregister_current_connection() {
        // テスト項目: 現在の接続は登録解除できる
        let registry = InMemoryConnectionRegistry::new();
        let alice = connection("alice");
        registry.register(alice.clone()).await;

        assert!(registry.unregister(&alice).await);
        assert_eq!(registry.lookup(&alice.user_id).await, None);
        assert!(!registry.unregister(&alice).await);
    }
}
