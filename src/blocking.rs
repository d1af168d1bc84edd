//! Blocking Facade
//!
//! Synchronous counterpart to [`crate::cache::DistributedCache`] for callers
//! without an async runtime. Each facade owns a private current-thread tokio
//! runtime and drives the async cache on it, so both call forms run the same
//! code and observe identical results.
//!
//! Must not be used from inside an async runtime; use the async cache there.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::{Builder, Runtime};

use crate::cache::{self, EntryOptions};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::storage::StorageAccessor;

// == Blocking Distributed Cache ==
/// Synchronous cache facade over a storage accessor.
#[derive(Debug)]
pub struct DistributedCache<A: StorageAccessor> {
    inner: cache::DistributedCache<A>,
    runtime: Runtime,
}

impl<A: StorageAccessor> DistributedCache<A> {
    // == Constructor ==
    /// Creates a blocking cache from a validated configuration.
    pub fn new(accessor: Arc<A>, config: &Config) -> Result<Self> {
        config.validate()?;
        Self::with_sweep_interval(accessor, config.sweep_interval())
    }

    /// Creates a blocking cache sweeping at most once per `sweep_interval`.
    pub fn with_sweep_interval(accessor: Arc<A>, sweep_interval: Duration) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| {
                CacheError::InvalidConfiguration(format!(
                    "blocking runtime could not be started: {}",
                    e
                ))
            })?;

        Ok(Self {
            inner: cache::DistributedCache::with_sweep_interval(accessor, sweep_interval),
            runtime,
        })
    }

    /// Blocking form of [`cache::DistributedCache::get`].
    pub fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.runtime.block_on(self.inner.get(key))
    }

    /// Blocking form of [`cache::DistributedCache::set`].
    pub fn set(&self, key: &str, value: Vec<u8>, options: &EntryOptions) -> Result<()> {
        self.runtime.block_on(self.inner.set(key, value, options))
    }

    /// Blocking form of [`cache::DistributedCache::refresh`].
    pub fn refresh(&self, key: &str) -> Result<()> {
        self.runtime.block_on(self.inner.refresh(key))
    }

    /// Blocking form of [`cache::DistributedCache::remove`].
    pub fn remove(&self, key: &str) -> Result<()> {
        self.runtime.block_on(self.inner.remove(key))
    }
}
