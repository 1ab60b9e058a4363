//! Local persisted state.
//!
//! A small JSON document remembering the display name and the last room, so
//! a restarted client rejoins where it left off.

use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub current_room: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/crossdrop/state.json`, when the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("crossdrop").join("state.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file yields the defaults; an unreadable one is an error.
    pub fn load(&self) -> Result<PersistedState, StoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(PersistedState::default()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    pub fn save(&self, state: &PersistedState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(state)?;
        std::fs::write(&self.path, json).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!("Saved client state to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_loads_defaults() {
        // テスト項目: ファイルが存在しなければデフォルト値になる
        // given (前提条件):
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(dir.path().join("state.json"));

        // when (操作):
        let state = store.load().unwrap();

        // then (期待する結果):
        assert_eq!(state, PersistedState::default());
    }

    #[test]
    fn test_save_then_load() {
        // テスト項目: 保存した状態を読み戻せる (親ディレクトリは自動作成)
        // given (前提条件):
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(dir.path().join("nested").join("state.json"));
        let state = PersistedState {
            display_name: Some("alice".to_string()),
            current_room: Some("r1".to_string()),
        };

        // when (操作):
        store.save(&state).unwrap();

        // then (期待する結果):
        assert_eq!(store.load().unwrap(), state);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        // テスト項目: 壊れた JSON は Corrupt エラーになる
        // given (前提条件):
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = LocalStore::new(&path);

        // when (操作):
        let result = store.load();

        // then (期待する結果):
        assert!(matches!(result, Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn test_partial_document_fills_missing_fields() {
        // テスト項目: 一部のフィールドだけの JSON も読み込める
        // given (前提条件):
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, r#"{"current_room":"r9"}"#).unwrap();

        // when (操作):
        let state = LocalStore::new(&path).load().unwrap();

        // then (期待する結果):
        assert_eq!(state.current_room.as_deref(), Some("r9"));
        assert!(state.display_name.is_none());
    }
}
