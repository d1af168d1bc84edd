//! Cache Module
//!
//! The entry model with sliding/absolute expiration and the distributed
//! cache orchestrator.

mod distributed;
mod entry;


// Re-export public types
pub use distributed::DistributedCache;
pub use entry::{compute_expires_at, CacheEntry, EntryOptions};
