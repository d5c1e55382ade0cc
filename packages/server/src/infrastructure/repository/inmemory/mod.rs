//! InMemory Repository 実装
//!
//! ドメイン層が定義する Repository trait の具体的な実装。
//! `tokio::sync::Mutex` で保護したコレクションをインメモリ DB として使用します。
//! プロセスの再起動をまたいだ永続化は行いません。

mod connection_registry;
mod room_store;
mod wait_queue;

pub use connection_registry::InMemoryConnectionRegistry;
pub use room_store::InMemoryRoomStore;
pub use wait_queue::InMemoryWaitQueue;

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::domain::{Connection, ConnectionId, Timestamp, UserId};

    /// テスト用の接続を作成
    pub fn connection(name: &str) -> Connection {
        Connection::new(
            ConnectionId::generate(),
            UserId::new(name.to_string()).unwrap(),
            Timestamp::new(1000),
        )
    }
}
