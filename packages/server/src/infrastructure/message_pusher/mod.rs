//! メッセージ送信（通知）の実装
//!
//! ## 実装
//!
//! - `websocket`: WebSocket 接続の送信タスクへチャンネル経由で渡す実装

pub mod websocket;

pub use websocket::WebSocketMessagePusher;
