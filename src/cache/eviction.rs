//! Eviction Policy Module
//!
//! Closed set of victim-selection strategies used when the cache is over capacity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cache::{SampledLru, Store};
use crate::error::{CacheError, Result};

// == Eviction Policy ==
/// Strategy for choosing which entry to drop when `max_items` is exceeded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvictionPolicy {
    /// Least recently used, approximated over a random sample of keys
    #[default]
    Lru,
}

impl EvictionPolicy {
    // == Select Victim ==
    /// Picks the key to evict, never `protected` unless it is the only entry.
    ///
    /// # Arguments
    /// * `store` - Entries to choose from
    /// * `samples` - Sample size, `None` = consider every key
    /// * `protected` - Key that was just inserted
    pub fn select_victim<T>(
        &self,
        store: &Store<T>,
        samples: Option<usize>,
        protected: &str,
    ) -> Option<String> {
        match self {
            EvictionPolicy::Lru => SampledLru::new(samples).select_victim(store, protected),
        }
    }
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvictionPolicy::Lru => write!(f, "lru"),
        }
    }
}

impl FromStr for EvictionPolicy {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lru" => Ok(EvictionPolicy::Lru),
            other => Err(CacheError::InvalidConfig(format!(
                "unknown eviction policy '{}'",
                other
            ))),
        }
    }
}
