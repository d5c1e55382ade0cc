//! 値オブジェクト
//!
//! 接続・ユーザー・ルーム・問題を識別する不変の値を定義します。
//! 生成時にバリデーションを行い、不正な値はドメインに入り込めないようにします。

use std::fmt;

use uuid::Uuid;

use super::error::ValueObjectError;

/// 受理判定を表す verdict の値
pub const ACCEPTED_VERDICT: &str = "AC";

/// 接続 ID
///
/// トランスポート層が受け付けた 1 本の接続を識別します。
/// 同じユーザーが再接続した場合でも、接続ごとに異なる値になります。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// 新しい接続 ID を生成
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ユーザー ID（対戦者の識別子）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    /// 新しい UserId を作成
    ///
    /// 前後の空白は取り除かれます。空文字列はエラーです。
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::EmptyUserId);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// ルーム ID
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomId(String);

impl RoomId {
    /// 新しい RoomId を作成（空文字列はエラー）
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::EmptyRoomId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<Uuid> for RoomId {
    fn from(value: Uuid) -> Self {
        Self(value.to_string())
    }
}

impl TryFrom<String> for RoomId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 問題 ID（問題カタログの主キー）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProblemId(i64);

impl ProblemId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ProblemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 判定結果
///
/// 値そのものはクライアントから受け取った文字列で、サーバーは中継するだけです。
/// `"AC"` のみが対戦終了を意味します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict(String);

impl Verdict {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// 受理（AC）かどうか
    pub fn is_accepted(&self) -> bool {
        self.0 == ACCEPTED_VERDICT
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// タイムスタンプ（Unix ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
