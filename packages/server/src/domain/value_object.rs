//! 値オブジェクト
//!
//! 文字列をそのまま持ち回らず、生成時に検証済みの型として扱います。

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValueObjectError;

/// 参加者の識別子（トークンから解決される）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    /// 空白だけの名前以外はそのまま受け付ける
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::EmptyIdentity);
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

impl TryFrom<String> for Identity {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Identity> for String {
    fn from(value: Identity) -> Self {
        value.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// ルームの識別子（URL パスの一部として使われる）
///
/// 空文字列以外は任意の文字列を受け付ける。パスに載せる際のエンコードは呼び出し側の責務。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomId(String);

impl RoomId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::EmptyRoomId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoomId> for String {
    fn from(value: RoomId) -> Self {
        value.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 不透明なアクセストークン
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// UUID v4 から新しいトークンを発行
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::EmptyToken);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Unix タイムスタンプ（ミリ秒）
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_accepts_plain_name() {
        // テスト項目: 通常の名前から Identity を生成できる
        // given (前提条件):
        let value = "kevin".to_string();

        // when (操作):
        let result = Identity::new(value);

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), "kevin");
    }

    #[test]
    fn test_identity_rejects_only_blank_values() {
        // テスト項目: 空白のみの Identity は拒否され、長い名前や空白入りの名前は受け付けられる
        // given (前提条件):
        let blank = "   ".to_string();
        let long = "a".repeat(500);
        let spaced = "Kevin Mitnick".to_string();

        // when (操作):
        let blank_result = Identity::new(blank);
        let long_result = Identity::new(long.clone());
        let spaced_result = Identity::new(spaced);

        // then (期待する結果):
        assert_eq!(blank_result, Err(ValueObjectError::EmptyIdentity));
        assert_eq!(long_result.unwrap().as_str(), long);
        assert_eq!(spaced_result.unwrap().as_str(), "Kevin Mitnick");
    }

    #[test]
    fn test_identity_deserializes_through_validation() {
        // テスト項目: JSON からのデシリアライズでも検証が行われる
        // given (前提条件):
        let valid = "\"admin\"";
        let invalid = "\"\"";

        // when (操作):
        let valid_result = serde_json::from_str::<Identity>(valid);
        let invalid_result = serde_json::from_str::<Identity>(invalid);

        // then (期待する結果):
        assert_eq!(valid_result.unwrap().as_str(), "admin");
        assert!(invalid_result.is_err());
    }

    #[test]
    fn test_room_id_rejects_only_empty_value() {
        // テスト項目: 空の RoomId だけが拒否され、空白や記号を含む ID は受け付けられる
        // given (前提条件):
        let cases = ["kevin_room", "with space", "a/b", "日本語ルーム"];

        // when (操作):
        let empty = RoomId::new(String::new());
        let results: Vec<_> = cases
            .iter()
            .map(|case| RoomId::new(case.to_string()))
            .collect();

        // then (期待する結果):
        assert_eq!(empty, Err(ValueObjectError::EmptyRoomId));
        for (case, result) in cases.iter().zip(results) {
            assert_eq!(result.unwrap().as_str(), *case);
        }
    }

    #[test]
    fn test_generated_tokens_are_unique() {
        // テスト項目: 発行されるトークンは毎回異なる
        // given (前提条件):
        let first = Token::generate();

        // when (操作):
        let second = Token::generate();

        // then (期待する結果):
        assert_ne!(first, second);
        assert!(Token::new(" ".to_string()).is_err());
    }
}
