//! 接続に通知するセッションイベント
//!
//! UseCase 層はこのイベントを `MessagePusher` に渡すだけで、
//! ワイヤーフォーマット（JSON）への変換は Infrastructure 層が担当します。

use super::value_object::{ProblemId, RoomId, UserId, Verdict};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// 対戦開始
    Start {
        room_id: RoomId,
        problem_id: ProblemId,
        opponent: UserId,
    },
    /// 相手が提出した
    Submission { from: UserId },
    /// 相手の提出に判定が出た
    Verdict { from: UserId, verdict: Verdict },
    /// 勝者の決定
    Winner { winner: UserId },
    /// 相手が切断した
    OpponentDisconnected,
    /// エラー通知
    Error { message: String },
    /// キープアライブ
    Ping,
}
