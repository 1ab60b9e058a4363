//! Identifiers shared between the relay server and session clients.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque room token.
///
/// The relay accepts any string as a room token; unpredictability of the
/// generated token is the only access control a room has.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomToken(String);

impl RoomToken {
    /// Wrap an arbitrary string as a room token. No format check is applied.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Navigation path under which a room's chat view is shared.
    pub fn share_path(&self) -> String {
        format!("/room/{}/chat", self.0)
    }
}

impl From<String> for RoomToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RoomToken {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for RoomToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Factory for generating fresh room tokens.
///
/// Tokens are random UUID v4 strings (122 random bits), which keeps casual
/// guessing or collision out of reach.
pub struct RoomTokenFactory;

impl RoomTokenFactory {
    /// Generate a new random room token.
    pub fn generate() -> RoomToken {
        RoomToken(uuid::Uuid::new_v4().to_string())
    }
}

/// Connection identifier assigned by the relay server when it accepts a
/// WebSocket connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Allocate a fresh identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Wrap an identifier received over the wire.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_token_factory_generate() {
        // テスト項目: RoomTokenFactory::generate() で UUID v4 形式のトークンを生成できる
        // when (操作):
        let token = RoomTokenFactory::generate();

        // then (期待する結果):
        assert_eq!(token.as_str().len(), 36);
        assert!(uuid::Uuid::parse_str(token.as_str()).is_ok());
    }

    #[test]
    fn test_room_token_factory_generate_uniqueness() {
        // テスト項目: 生成されるトークンは毎回異なる
        // when (操作):
        let token1 = RoomTokenFactory::generate();
        let token2 = RoomTokenFactory::generate();

        // then (期待する結果):
        assert_ne!(token1, token2);
    }

    #[test]
    fn test_room_token_accepts_any_string() {
        // テスト項目: 任意の文字列 (空文字を含む) をルームトークンとして扱える
        // when (操作):
        let empty = RoomToken::new("");
        let free_form = RoomToken::from("not a uuid / with spaces");

        // then (期待する結果):
        assert_eq!(empty.as_str(), "");
        assert_eq!(free_form.as_str(), "not a uuid / with spaces");
    }

    #[test]
    fn test_room_token_share_path() {
        // テスト項目: 共有用のパスにトークンがそのまま埋め込まれる
        // given (前提条件):
        let token = RoomToken::new("r1");

        // then (期待する結果):
        assert_eq!(token.share_path(), "/room/r1/chat");
    }

    #[test]
    fn test_room_token_serializes_as_plain_string() {
        // テスト項目: シリアライズ時はラップされずに文字列になる
        // given (前提条件):
        let token = RoomToken::new("r1");

        // when (操作):
        let json = serde_json::to_string(&token).unwrap();

        // then (期待する結果):
        assert_eq!(json, "\"r1\"");
    }
}
