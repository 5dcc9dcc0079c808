use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::*;

use crate::error::StoreError;

/// The persisted slots of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKey {
    ApiKey,
    AssistantId,
    ThreadId,
}

impl StateKey {
    pub fn file_name(self) -> &'static str {
        match self {
            StateKey::ApiKey => "apikey.txt",
            StateKey::AssistantId => "assistant_id.txt",
            StateKey::ThreadId => "thread_id.txt",
        }
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Whole-value storage by key. A missing value means "not created yet".
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: StateKey) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: StateKey, value: &str) -> Result<(), StoreError>;
    /// Deleting a missing value is not an error.
    async fn delete(&self, key: StateKey) -> Result<(), StoreError>;
}

/// One file per key inside `dir`.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: StateKey) -> PathBuf {
        self.dir.join(key.file_name())
    }
}

#[async_trait]
impl SessionStore for FileStore {
    async fn get(&self, key: StateKey) -> Result<Option<String>, StoreError> {
        match tokio::fs::read_to_string(self.path(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { key, source }),
        }
    }

    async fn set(&self, key: StateKey, value: &str) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| StoreError::Io { key, source })?;
        tokio::fs::write(self.path(key), value)
            .await
            .map_err(|source| StoreError::Io { key, source })?;
        trace!("FileStore set {}", self.path(key).display());
        Ok(())
    }

    async fn delete(&self, key: StateKey) -> Result<(), StoreError> {
        match tokio::fs::remove_file(self.path(key)).await {
            Ok(()) => {
                trace!("FileStore deleted {}", self.path(key).display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { key, source }),
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<StateKey, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn get(&self, key: StateKey) -> Result<Option<String>, StoreError> {
        Ok(self.values.lock().await.get(&key).cloned())
    }

    async fn set(&self, key: StateKey, value: &str) -> Result<(), StoreError> {
        self.values.lock().await.insert(key, value.to_string());
        Ok(())
    }

    async fn delete(&self, key: StateKey) -> Result<(), StoreError> {
        self.values.lock().await.remove(&key);
        Ok(())
    }
}
