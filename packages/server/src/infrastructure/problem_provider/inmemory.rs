//! インメモリの問題カタログ
//!
//! 起動時に与えられた問題 ID の一覧から一様無作為に 1 つを選びます。
//! 一覧は CLI 引数か JSON ファイル（整数の配列）から読み込みます。

use std::path::Path;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use thiserror::Error;

use crate::domain::{ProblemId, ProblemProvider};

/// カタログ読み込みのエラー
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read problem catalog '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("problem catalog '{path}' must be a JSON array of integers: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// インメモリ問題カタログ
#[derive(Debug, Clone, Default)]
pub struct InMemoryProblemCatalog {
    problem_ids: Vec<ProblemId>,
}

impl InMemoryProblemCatalog {
    /// 問題 ID の一覧からカタログを作成（重複は取り除く）
    pub fn from_ids(ids: impl IntoIterator<Item = i64>) -> Self {
        let mut problem_ids: Vec<ProblemId> = Vec::new();
        for id in ids.into_iter().map(ProblemId::new) {
            if !problem_ids.contains(&id) {
                problem_ids.push(id);
            }
        }
        Self { problem_ids }
    }

    /// JSON ファイル（例: `[1, 2, 3]`）からカタログを読み込む
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let ids: Vec<i64> = serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::from_ids(ids))
    }

    /// 既存のカタログに問題 ID を追加
    pub fn extend(&mut self, ids: impl IntoIterator<Item = i64>) {
        for id in ids.into_iter().map(ProblemId::new) {
            if !self.problem_ids.contains(&id) {
                self.problem_ids.push(id);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.problem_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problem_ids.is_empty()
    }
}

#[async_trait]
impl ProblemProvider for InMemoryProblemCatalog {
    async fn random_problem_id(&self) -> Option<ProblemId> {
        self.problem_ids.choose(&mut rand::thread_rng()).copied()
    }
}
