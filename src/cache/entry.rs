//! Cache Entry Module
//!
//! Defines the structure for individual cache entries and their timestamps.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The stored value
    pub value: T,
    /// Set on every `set` of this key; TTL is measured from here
    pub inserted_at: Instant,
    /// Refreshed on every `set` and every successful `get`
    pub last_accessed_at: Instant,
    /// Store-wide access counter stamped with `last_accessed_at`
    pub access_tick: u64,
    /// Position of the key in the store's key slab
    pub(crate) slot: usize,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates a new entry stamped with the current time.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `tick` - Access tick handed out by the store
    pub fn new(value: T, tick: u64) -> Self {
        let now = Instant::now();

        Self {
            value,
            inserted_at: now,
            last_accessed_at: now,
            access_tick: tick,
            slot: 0,
        }
    }

    // == Touch ==
    /// Marks the entry as recently used without changing its TTL window.
    pub fn touch(&mut self, tick: u64) {
        self.last_accessed_at = Instant::now();
        self.access_tick = tick;
    }

    // == Refresh ==
    /// Overwrites the value and resets both timestamps.
    ///
    /// A refreshed entry starts a fresh TTL window and counts as just used.
    pub fn refresh(&mut self, value: T, tick: u64) {
        let now = Instant::now();
        self.value = value;
        self.inserted_at = now;
        self.last_accessed_at = now;
        self.access_tick = tick;
    }

    // == Age ==
    /// Time elapsed since the entry was last set.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.inserted_at)
    }

    /// Recency key used for LRU ordering; smaller means older.
    pub fn recency(&self) -> (Instant, u64) {
        (self.last_accessed_at, self.access_tick)
    }
}
