//! Value Object 定義
//!
//! 不変で、値そのものが同一性を表すドメインの型。
//! 生成時にバリデーションを行い、不正な値を持つインスタンスは存在しない。

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::ValueObjectError;

/// クライアント ID の最大長
const CLIENT_ID_MAX_LEN: usize = 64;

/// 参加者名の最大文字数
const PARTICIPANT_NAME_MAX_CHARS: usize = 50;

/// セッションコードの長さ
pub const SESSION_ID_LEN: usize = 6;

/// クライアント ID（トランスポートが接続ごとに割り当てる識別子）
///
/// 形式には意味を持たせず、不透明なハンドルとして扱う。
/// 再接続すると別の ID になる。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::ClientIdEmpty);
        }
        if value.len() > CLIENT_ID_MAX_LEN {
            return Err(ValueObjectError::ClientIdTooLong(CLIENT_ID_MAX_LEN));
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

impl TryFrom<String> for ClientId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// セッションコード
///
/// 前後の空白を除去し、大文字に正規化して保持する。
/// 長さは強制しない（コードによる暗黙の参加を許容するため）。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let normalized = value.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(ValueObjectError::SessionIdEmpty);
        }
        Ok(Self(normalized))
    }

    /// Factory が生成した、正規化済みのコードから作る
    pub(super) fn from_generated(code: String) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for SessionId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 参加者名（trim 済み、空でない）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantName(String);

impl ParticipantName {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::NameEmpty);
        }
        if trimmed.chars().count() > PARTICIPANT_NAME_MAX_CHARS {
            return Err(ValueObjectError::NameTooLong(PARTICIPANT_NAME_MAX_CHARS));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// 大文字小文字を区別しない比較（名前の重複チェック用）
    pub fn matches(&self, other: &ParticipantName) -> bool {
        self.0.to_lowercase() == other.0.to_lowercase()
    }
}

impl TryFrom<String> for ParticipantName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// タイムスタンプ（Unix ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// セッションのステージ（画面）
///
/// `Registration` → `Connections` → `Visualization` の順に進む。
/// 例外として、管理者はどのステージからでも `Connections` に戻せる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Page {
    #[default]
    Registration,
    Connections,
    Visualization,
}

impl Page {
    /// 次のステージ。最終ステージでは `None`
    pub fn next(self) -> Option<Page> {
        match self {
            Page::Registration => Some(Page::Connections),
            Page::Connections => Some(Page::Visualization),
            Page::Visualization => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Registration => "registration",
            Page::Connections => "connections",
            Page::Visualization => "visualization",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
