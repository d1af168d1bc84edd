//! Distributed Cache Module
//!
//! The cache orchestrator: get/set/refresh/remove over a storage accessor,
//! with sliding-expiration renewal on read and a throttled inline sweep of
//! expired entries. There is no background eviction task; cleanup rides
//! along with normal traffic, at most once per sweep interval.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info};

use crate::cache::{CacheEntry, EntryOptions};
use crate::config::Config;
use crate::error::Result;
use crate::storage::StorageAccessor;

// == Distributed Cache ==
/// Cache facade over a remote document store.
///
/// Every operation is safe to call from concurrent tasks. The only shared
/// mutable state is the last-sweep timestamp, which is a best-effort
/// throttle: a race on it can at worst skip or double a sweep, never
/// corrupt data.
#[derive(Debug)]
pub struct DistributedCache<A: StorageAccessor> {
    accessor: Arc<A>,
    sweep_interval_ms: i64,
    /// Epoch milliseconds of the last sweep; initialized to construction time.
    last_sweep_ms: AtomicI64,
}

impl<A: StorageAccessor> DistributedCache<A> {
    // == Constructor ==
    /// Creates a cache from a validated configuration.
    ///
    /// Fails with [`crate::error::CacheError::InvalidConfiguration`] when
    /// required configuration fields are missing.
    pub fn new(accessor: Arc<A>, config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_sweep_interval(accessor, config.sweep_interval()))
    }

    /// Creates a cache sweeping at most once per `sweep_interval`.
    pub fn with_sweep_interval(accessor: Arc<A>, sweep_interval: Duration) -> Self {
        Self {
            accessor,
            sweep_interval_ms: sweep_interval.as_millis() as i64,
            last_sweep_ms: AtomicI64::new(Utc::now().timestamp_millis()),
        }
    }

    // == Get ==
    /// Retrieves the value stored under `key`.
    ///
    /// Reading renews a sliding expiration window as a side effect. Returns
    /// `Ok(None)` for keys that are absent or logically expired: expiration
    /// is enforced at read time, independent of whether the physical sweep
    /// has removed the document yet.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.sweep_if_due().await?;
        self.refresh(key).await?;

        let now = Utc::now();
        let entry = self.accessor.get(key).await?;

        Ok(entry.filter(|e| !e.is_expired(now)).map(|e| e.value))
    }

    // == Set ==
    /// Stores `value` under `key`, fully replacing any existing entry.
    ///
    /// Fails with [`crate::error::CacheError::InvalidConfiguration`] when
    /// the options resolve to an absolute expiration that is not in the
    /// future.
    pub async fn set(&self, key: &str, value: Vec<u8>, options: &EntryOptions) -> Result<()> {
        let entry = CacheEntry::new(key.to_string(), value, options)?;
        self.accessor.upsert(key, entry).await?;

        self.sweep_if_due().await
    }

    // == Refresh ==
    /// Renews the expiration of the entry under `key` without reading its
    /// value.
    ///
    /// A no-op (not an error) when the key is absent or already logically
    /// expired; an expired entry is never revived by a late refresh.
    pub async fn refresh(&self, key: &str) -> Result<()> {
        let now = Utc::now();

        if let Some(mut entry) = self.accessor.get(key).await? {
            if !entry.is_expired(now) {
                entry.refresh_expires_at();
                self.accessor.upsert(key, entry).await?;
            }
        }

        self.sweep_if_due().await
    }

    // == Remove ==
    /// Unconditionally deletes the entry under `key`. A no-op when absent.
    pub async fn remove(&self, key: &str) -> Result<()> {
        self.accessor.delete(key).await?;
        Ok(())
    }

    // == Throttled Sweep ==
    /// Physically deletes expired entries, at most once per sweep interval.
    ///
    /// The compare-and-swap on the last-sweep timestamp keeps concurrent
    /// callers from issuing duplicate bulk deletes; losing the race simply
    /// means another caller is sweeping. The sweep reclaims storage only,
    /// correctness of reads never depends on it.
    async fn sweep_if_due(&self) -> Result<()> {
        let now = Utc::now();
        let now_ms = now.timestamp_millis();
        let last_ms = self.last_sweep_ms.load(Ordering::Relaxed);

        if now_ms <= last_ms + self.sweep_interval_ms {
            return Ok(());
        }

        if self
            .last_sweep_ms
            .compare_exchange(last_ms, now_ms, Ordering::Relaxed, Ordering::Relaxed)
            .is_err()
        {
            return Ok(());
        }

        let removed = self.accessor.delete_expired_before(now).await?;

        if removed > 0 {
            info!("Sweep removed {} expired cache entries", removed);
        } else {
            debug!("Sweep found no expired entries");
        }

        Ok(())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;
    use crate::storage::MemoryAccessor;

    /// Cache with a sweep interval long enough that sweeps never interfere.
    fn quiet_cache() -> (DistributedCache<MemoryAccessor>, Arc<MemoryAccessor>) {
        let accessor = Arc::new(MemoryAccessor::new());
        let cache =
            DistributedCache::with_sweep_interval(accessor.clone(), Duration::from_secs(3600));
        (cache, accessor)
    }

    #[tokio::test]
    async fn test_get_absent_returns_none() {
        let (cache, _) = quiet_cache();

        let result = cache.get("missing").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_set_then_get_round_trips_bytes() {
        let (cache, _) = quiet_cache();

        cache
            .set("k", vec![0, 159, 146, 150], &EntryOptions::never())
            .await
            .unwrap();

        let value = cache.get("k").await.unwrap();
        assert_eq!(value, Some(vec![0, 159, 146, 150]));
    }

    #[tokio::test]
    async fn test_set_overwrites_existing_value() {
        let (cache, _) = quiet_cache();

        cache
            .set("k", b"first".to_vec(), &EntryOptions::never())
            .await
            .unwrap();
        cache
            .set("k", b"second".to_vec(), &EntryOptions::never())
            .await
            .unwrap();

        let value = cache.get("k").await.unwrap();
        assert_eq!(value, Some(b"second".to_vec()));
    }

    #[tokio::test]
    async fn test_keys_are_case_sensitive() {
        let (cache, _) = quiet_cache();

        cache
            .set("MyKey", b"v".to_vec(), &EntryOptions::never())
            .await
            .unwrap();

        assert!(cache.get("mykey").await.unwrap().is_none());
        assert!(cache.get("MyKey").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_remove_then_get_returns_none() {
        let (cache, _) = quiet_cache();

        cache
            .set("k", b"v".to_vec(), &EntryOptions::never())
            .await
            .unwrap();
        cache.remove("k").await.unwrap();

        assert!(cache.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove_absent_is_a_no_op() {
        let (cache, _) = quiet_cache();

        assert!(cache.remove("missing").await.is_ok());
    }

    #[tokio::test]
    async fn test_refresh_absent_is_a_no_op() {
        let (cache, _) = quiet_cache();

        assert!(cache.refresh("missing").await.is_ok());
    }

    #[tokio::test]
    async fn test_set_with_past_absolute_expiration_fails() {
        let (cache, accessor) = quiet_cache();
        let options = EntryOptions::default()
            .with_absolute_expiration(Utc::now() - chrono::Duration::seconds(1));

        let result = cache.set("k", b"v".to_vec(), &options).await;

        assert!(matches!(result, Err(CacheError::InvalidConfiguration(_))));
        assert!(accessor.is_empty().await, "nothing written on failure");
    }

    #[tokio::test]
    async fn test_expired_entry_reads_as_absent_before_sweep() {
        let (cache, accessor) = quiet_cache();

        // Plant an already-expired document directly, as a sweep-lagged
        // store would contain.
        let mut entry =
            CacheEntry::new("k".to_string(), b"v".to_vec(), &EntryOptions::never()).unwrap();
        entry.expires_at = Some(Utc::now() - chrono::Duration::seconds(1));
        accessor.upsert("k", entry).await.unwrap();

        assert!(cache.get("k").await.unwrap().is_none());
        assert!(
            accessor.contains("k").await,
            "document still present physically; only the read filtered it"
        );
    }

    #[tokio::test]
    async fn test_refresh_does_not_revive_expired_entry() {
        let (cache, accessor) = quiet_cache();

        let options = EntryOptions::default().with_sliding_expiration(Duration::from_secs(3600));
        cache.set("k", b"v".to_vec(), &options).await.unwrap();

        // Expire it behind the cache's back.
        let mut entry = accessor.get("k").await.unwrap().unwrap();
        entry.expires_at = Some(Utc::now() - chrono::Duration::seconds(1));
        accessor.upsert("k", entry).await.unwrap();

        cache.refresh("k").await.unwrap();

        let stored = accessor.get("k").await.unwrap().unwrap();
        assert!(
            stored.is_expired(Utc::now()),
            "refresh must not extend an already-expired entry"
        );
    }

    #[tokio::test]
    async fn test_get_renews_sliding_expiration() {
        let (cache, accessor) = quiet_cache();

        let options = EntryOptions::default().with_sliding_expiration(Duration::from_secs(60));
        cache.set("k", b"v".to_vec(), &options).await.unwrap();

        // Age the stored expiration, then confirm a read pushes it forward.
        let mut entry = accessor.get("k").await.unwrap().unwrap();
        entry.expires_at = Some(Utc::now() + chrono::Duration::seconds(1));
        accessor.upsert("k", entry).await.unwrap();

        cache.get("k").await.unwrap();

        let renewed = accessor.get("k").await.unwrap().unwrap();
        assert!(renewed.expires_at.unwrap() > Utc::now() + chrono::Duration::seconds(30));
    }

    #[tokio::test]
    async fn test_sweep_waits_for_interval() {
        let accessor = Arc::new(MemoryAccessor::new());
        let cache =
            DistributedCache::with_sweep_interval(accessor.clone(), Duration::from_secs(3600));

        // Plant an expired document; traffic inside the interval must not
        // physically remove it.
        let mut entry =
            CacheEntry::new("k".to_string(), b"v".to_vec(), &EntryOptions::never()).unwrap();
        entry.expires_at = Some(Utc::now() - chrono::Duration::seconds(1));
        accessor.upsert("k", entry).await.unwrap();

        cache.get("unrelated").await.unwrap();

        assert!(accessor.contains("k").await);
    }

    #[tokio::test]
    async fn test_sweep_fires_after_interval() {
        let accessor = Arc::new(MemoryAccessor::new());
        let cache =
            DistributedCache::with_sweep_interval(accessor.clone(), Duration::from_millis(50));

        let mut entry =
            CacheEntry::new("k".to_string(), b"v".to_vec(), &EntryOptions::never()).unwrap();
        entry.expires_at = Some(Utc::now() - chrono::Duration::seconds(1));
        accessor.upsert("k", entry).await.unwrap();

        tokio::time::sleep(Duration::from_millis(80)).await;
        cache.get("unrelated").await.unwrap();

        assert!(!accessor.contains("k").await, "sweep should have purged it");
    }

    #[tokio::test]
    async fn test_new_rejects_invalid_config() {
        let accessor = Arc::new(MemoryAccessor::new());

        let result = DistributedCache::new(accessor, &Config::default());
        assert!(matches!(result, Err(CacheError::InvalidConfiguration(_))));
    }
}
