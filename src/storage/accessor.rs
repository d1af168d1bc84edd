//! Storage Accessor Contract
//!
//! Abstracts the remote document store to the four operations the cache
//! needs. Any key-value store with per-document atomic replace and a way to
//! delete entries older than a cutoff (range delete, or a scan-and-delete
//! loop) can implement this trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::cache::CacheEntry;
use crate::error::StorageError;

// == Storage Accessor Trait ==
/// Asynchronous access to the backing document store.
///
/// Implementations are responsible for their own transport concerns
/// (timeouts, retries, connection pooling); the cache propagates their
/// errors verbatim and never retries.
#[async_trait]
pub trait StorageAccessor: Send + Sync {
    /// Fetches the entry stored under `key`, or `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, StorageError>;

    /// Stores `entry` under `key`, fully replacing any existing document.
    /// Inserts when absent.
    async fn upsert(&self, key: &str, entry: CacheEntry) -> Result<(), StorageError>;

    /// Deletes the entry stored under `key`. Not an error when absent.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Bulk-deletes every entry whose `expires_at` is before `cutoff`.
    ///
    /// Entries without an expiration are never matched. Returns the number
    /// of entries removed.
    async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> Result<u64, StorageError>;
}
