//! Incremental cache of extracted component metadata.

mod store;

pub use store::{CacheEntry, CacheStats, CacheStore, DependencySnapshot, Staleness};
