//! ProblemProvider trait 定義
//!
//! 問題カタログ（外部コラボレーター）から問題 ID を 1 つ無作為に取得します。

use async_trait::async_trait;

use super::ProblemId;

/// 問題カタログへのインターフェース
///
/// 並行に呼び出されても安全でなければなりません。
/// 呼び出し側はタイムアウトを課し、期限切れを「カタログが空」と同じに扱います。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProblemProvider: Send + Sync {
    /// 一様無作為に選んだ問題 ID を返す（カタログが空なら `None`）
    async fn random_problem_id(&self) -> Option<ProblemId>;
}
