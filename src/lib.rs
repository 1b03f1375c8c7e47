//! Simple Cache - A bounded in-process key/value cache
//!
//! String keys, generic values, optional entry ceiling enforced by sampled
//! LRU eviction, and optional TTL expiration. Both are evaluated lazily on
//! access; there is no background task.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{Cache, EvictionPolicy, KeyValueCache};
pub use config::{CacheOptions, ResolvedConfig};
pub use error::{CacheError, Result};
