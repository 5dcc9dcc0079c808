use sha2::{Digest, Sha256};
use std::str::FromStr;
use std::sync::Arc;
use tracing::*;

use crate::error::StoreError;
use crate::store::{SessionStore, StateKey};

/// How the credential is written to the fingerprint slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FingerprintMode {
    /// The trimmed key itself.
    #[default]
    Plain,
    /// Hex SHA-256 of the trimmed key, so the key never lands on disk.
    Sha256,
}

impl FromStr for FingerprintMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" => Ok(FingerprintMode::Plain),
            "sha256" => Ok(FingerprintMode::Sha256),
            other => Err(format!("unknown fingerprint mode `{}`", other)),
        }
    }
}

pub fn fingerprint(api_key: &str, mode: FingerprintMode) -> String {
    let key = api_key.trim();
    match mode {
        FingerprintMode::Plain => key.to_string(),
        FingerprintMode::Sha256 => {
            let mut hasher = Sha256::new();
            hasher.update(key.as_bytes());
            hex::encode(hasher.finalize())
        }
    }
}

/// Cached assistant/thread handles and the fingerprint they belong to.
///
/// No locking: two requests racing on an empty slot may both create a remote
/// object, the last write wins.
pub struct SessionState {
    store: Arc<dyn SessionStore>,
    fingerprint_mode: FingerprintMode,
}

impl SessionState {
    pub fn new(store: Arc<dyn SessionStore>, fingerprint_mode: FingerprintMode) -> Self {
        Self {
            store,
            fingerprint_mode,
        }
    }

    async fn handle(&self, key: StateKey) -> Result<Option<String>, StoreError> {
        Ok(self
            .store
            .get(key)
            .await?
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty()))
    }

    pub async fn assistant_id(&self) -> Result<Option<String>, StoreError> {
        self.handle(StateKey::AssistantId).await
    }

    pub async fn set_assistant_id(&self, assistant_id: &str) -> Result<(), StoreError> {
        self.store.set(StateKey::AssistantId, assistant_id).await
    }

    pub async fn thread_id(&self) -> Result<Option<String>, StoreError> {
        self.handle(StateKey::ThreadId).await
    }

    pub async fn set_thread_id(&self, thread_id: &str) -> Result<(), StoreError> {
        self.store.set(StateKey::ThreadId, thread_id).await
    }

    pub async fn clear_thread(&self) -> Result<(), StoreError> {
        self.store.delete(StateKey::ThreadId).await
    }

    /// Drops both cached handles when the stored fingerprint belongs to another
    /// credential, then records the fingerprint of `api_key`.
    ///
    /// Returns whether the handles were dropped.
    pub async fn sync_credential(&self, api_key: &str) -> Result<bool, StoreError> {
        let current = fingerprint(api_key, self.fingerprint_mode);
        let mut invalidated = false;

        if let Some(stored) = self.store.get(StateKey::ApiKey).await? {
            let cached = self.assistant_id().await?.is_some() || self.thread_id().await?.is_some();
            if stored.trim() != current && cached {
                info!("API key changed, dropping cached assistant and thread");
                self.store.delete(StateKey::AssistantId).await?;
                self.store.delete(StateKey::ThreadId).await?;
                invalidated = true;
            }
        }

        self.store.set(StateKey::ApiKey, &current).await?;
        Ok(invalidated)
    }
}
