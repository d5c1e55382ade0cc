//! Repository trait 定義
//!
//! ドメイン層が必要とする状態ストアのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! 各メソッドは単体でアトミックです。複数のストアにまたがる操作の一貫性は
//! UseCase 層の `Arbiter` が保証します。

use async_trait::async_trait;

use super::{Connection, ConnectionId, RepositoryError, Room, RoomId, UserId};

/// ユーザー ID と現在の接続の対応表
///
/// 1 つのユーザー ID に対して登録される接続は常に高々 1 つです。
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// 接続を登録
    ///
    /// 同じユーザー ID の接続が既に登録されていた場合は置き換え、
    /// 置き換えられた接続を返します（evict-and-replace）。
    async fn register(&self, connection: Connection) -> Option<Connection>;

    /// 登録を解除
    ///
    /// 登録がまだ `connection` を指している場合のみ削除し、`true` を返します。
    /// 新しい接続に置き換え済みの場合は何もしません。
    async fn unregister(&self, connection: &Connection) -> bool;

    /// ユーザー ID から現在の接続を取得
    async fn lookup(&self, user_id: &UserId) -> Option<Connection>;

    /// 登録数
    async fn count(&self) -> usize;

    /// `connection` が現在の登録かどうか
    async fn is_current(&self, connection: &Connection) -> bool {
        self.lookup(&connection.user_id)
            .await
            .is_some_and(|current| current.id == connection.id)
    }
}

/// 対戦待ちの FIFO キュー
///
/// `dequeue_pair` で取り出した接続の到着順は、`restore` または `remove` まで保持されます。
#[async_trait]
pub trait WaitQueue: Send + Sync {
    /// 末尾に追加（待機中または取り出し中の接続はエラー）
    async fn enqueue(&self, connection: Connection) -> Result<(), RepositoryError>;

    /// 先頭の 2 接続をまとめて取り出す
    ///
    /// 2 接続未満の場合は `None` を返し、キューは変更しません。
    async fn dequeue_pair(&self) -> Option<(Connection, Connection)>;

    /// 取り出した接続を到着順どおりの位置に戻す
    ///
    /// 複数の取り出しが並行して戻されても、キュー全体は到着順のままです。
    async fn restore(&self, connections: Vec<Connection>);

    /// 特定の接続を削除（冪等）。待機中から削除した場合は `true`
    ///
    /// 取り出し中の接続の到着順の記録もここで破棄されます。
    async fn remove(&self, connection_id: &ConnectionId) -> bool;

    /// 待機中の接続を先頭から順に取得
    async fn snapshot(&self) -> Vec<Connection>;

    async fn count(&self) -> usize;
}

/// 対戦ルームのストア
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// ルームを追加（同じ ID が既にあればエラー）
    async fn insert(&self, room: Room) -> Result<(), RepositoryError>;

    async fn get(&self, room_id: &RoomId) -> Option<Room>;

    /// 接続が占有しているルームを取得
    async fn find_by_connection(&self, connection_id: &ConnectionId) -> Option<Room>;

    /// ルームを削除し、`Closed` にしたルームを返す
    ///
    /// 既に存在しないルームに対しては何もせず `None` を返します（冪等）。
    async fn close(&self, room_id: &RoomId) -> Option<Room>;

    /// 全ルームを作成日時順に取得
    async fn list(&self) -> Vec<Room>;

    async fn count(&self) -> usize;
}
