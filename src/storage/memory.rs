//! In-Memory Storage Accessor
//!
//! A [`StorageAccessor`] backed by a process-local map. Useful as a test
//! double and for running the cache without a remote store; it offers the
//! same per-key replace semantics a document store would.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::cache::CacheEntry;
use crate::error::StorageError;
use crate::storage::StorageAccessor;

// == Memory Accessor ==
/// In-memory document store keyed by entry key.
#[derive(Debug, Default)]
pub struct MemoryAccessor {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryAccessor {
    /// Creates an empty accessor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of physically stored entries, expired or not.
    ///
    /// Lets tests distinguish logical expiration from physical removal.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true when no entries are physically stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Returns whether `key` is physically present, regardless of expiration.
    pub async fn contains(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }
}

#[async_trait]
impl StorageAccessor for MemoryAccessor {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, StorageError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn upsert(&self, key: &str, entry: CacheEntry) -> Result<(), StorageError> {
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> Result<u64, StorageError> {
        let mut entries = self.entries.write().await;
        let before = entries.len();

        entries.retain(|_, entry| match entry.expires_at {
            Some(expires) => expires >= cutoff,
            None => true,
        });

        Ok((before - entries.len()) as u64)
    }
}
