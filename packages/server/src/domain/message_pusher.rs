//! MessagePusher trait 定義
//!
//! 接続へのメッセージ送信（通知）とトランスポートのクローズを抽象化します。
//! 具体的な実装（WebSocket など）は Infrastructure 層が提供します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, SessionEvent};

/// 接続の送信タスクへ渡すフレーム
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushFrame {
    /// テキストフレーム（JSON）
    Text(String),
    /// トランスポートを閉じる
    Close,
}

/// 接続ごとの送信チャンネル
pub type PusherChannel = mpsc::UnboundedSender<PushFrame>;

/// MessagePusher trait
///
/// 送信はすべて fire-and-forget で、他の接続の処理をブロックしません。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続の送信チャンネルを登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続の送信チャンネルを登録解除
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 特定の接続にイベントを送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &SessionEvent,
    ) -> Result<(), MessagePushError>;

    /// 複数の接続に同じイベントを送信（一部の失敗は許容）
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &SessionEvent,
    ) -> Result<(), MessagePushError>;

    /// 接続のトランスポートを閉じる
    async fn close(&self, connection_id: &ConnectionId) -> Result<(), MessagePushError>;
}
