//! Storage Module
//!
//! The accessor seam between the cache and the backing document store, plus
//! an in-memory implementation for tests and local development.

mod accessor;
mod memory;

pub use accessor::StorageAccessor;
pub use memory::MemoryAccessor;
