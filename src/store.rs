//! Durable storage for the conversation transcript
//!
//! `KvStore` is the storage port (read/write/clear); `TranscriptStore` keeps
//! the transcript under a namespaced key on top of it.

mod memory;
mod sqlite;

pub use memory::InMemoryKvStore;
pub use sqlite::SqliteKvStore;

use crate::transcript::Transcript;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Namespace prefix used when none is configured
pub const DEFAULT_NAMESPACE: &str = "course_assistant:";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Failed to encode transcript: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Storage lock poisoned")]
    LockPoisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Key-value storage port
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    async fn remove(&self, key: &str) -> StoreResult<()>;
}

#[async_trait]
impl<T: KvStore + ?Sized> KvStore for Arc<T> {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key).await
    }
}

/// Transcript persistence under `<namespace>history`
pub struct TranscriptStore<S> {
    kv: S,
    key: String,
}

impl<S: KvStore> TranscriptStore<S> {
    pub fn new(kv: S, namespace: &str) -> Self {
        Self {
            kv,
            key: format!("{namespace}history"),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the stored transcript, falling back to the welcome transcript.
    ///
    /// Storage errors and malformed values are logged and treated as "no
    /// history"; they never reach the caller.
    pub async fn restore(&self) -> Transcript {
        let raw = match self.kv.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Transcript::welcome(),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Failed to read stored transcript");
                return Transcript::welcome();
            }
        };

        match serde_json::from_str::<Transcript>(&raw) {
            Ok(transcript) => {
                tracing::debug!(key = %self.key, messages = transcript.len(), "Restored transcript");
                transcript
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Discarding malformed stored transcript");
                Transcript::welcome()
            }
        }
    }

    pub async fn persist(&self, transcript: &Transcript) -> StoreResult<()> {
        let raw = serde_json::to_string(transcript)?;
        self.kv.set(&self.key, &raw).await
    }

    /// Remove the stored transcript entirely
    pub async fn clear(&self) -> StoreResult<()> {
        self.kv.remove(&self.key).await
    }
}
