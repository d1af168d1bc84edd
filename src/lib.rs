//! Mongo Cache - a distributed cache backed by a remote document store
//!
//! Provides byte-array get/set/refresh/remove with sliding and absolute
//! expiration, and a throttled inline sweep of expired entries instead of a
//! dedicated eviction process.

pub mod blocking;
pub mod cache;
pub mod config;
pub mod error;
pub mod storage;

pub use cache::{CacheEntry, DistributedCache, EntryOptions};
pub use config::Config;
pub use error::{CacheError, Result, StorageError};
pub use storage::{MemoryAccessor, StorageAccessor};
