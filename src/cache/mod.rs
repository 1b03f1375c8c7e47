//! Cache Module
//!
//! Provides in-process caching with TTL expiration and sampled LRU eviction.

mod entry;
mod eviction;
mod expiry;
mod facade;
mod lru;
mod store;
mod traits;


// Re-export public types
pub use entry::CacheEntry;
pub use eviction::EvictionPolicy;
pub use expiry::ExpirationAdvisor;
pub use facade::Cache;
pub use lru::SampledLru;
pub use store::Store;
pub use traits::KeyValueCache;
