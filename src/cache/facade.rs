//! Cache Facade Module
//!
//! Thread-safe cache combining the entry store, TTL expiration and eviction
//! behind a single lock.

use std::time::Instant;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::cache::{EvictionPolicy, ExpirationAdvisor, Store};
use crate::config::{CacheOptions, ResolvedConfig};
use crate::error::Result;

// == Cache ==
/// Bounded, expiring key-value cache keyed by strings.
///
/// Expiration and eviction are both lazy: expired entries are dropped when a
/// lookup or count observes them, and eviction happens inline in `set`.
/// Share across threads with `Arc<Cache<T>>`.
#[derive(Debug)]
pub struct Cache<T> {
    /// Settings fixed at construction
    config: ResolvedConfig,
    /// TTL rule derived from `config.max_age`
    advisor: ExpirationAdvisor,
    /// Entries, guarded for the full duration of every operation
    store: Mutex<Store<T>>,
}

impl<T> Default for Cache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Cache<T> {
    // == Constructors ==
    /// Creates an unbounded cache whose entries never expire.
    pub fn new() -> Self {
        Self::from_config(ResolvedConfig::default())
    }

    /// Creates a cache from caller-supplied options.
    pub fn with_options(options: CacheOptions) -> Self {
        Self::from_config(options.resolve())
    }

    /// Creates a cache from already resolved settings.
    ///
    /// A bounded config without a policy gets the default one, so a set
    /// `max_items` is always enforced.
    pub fn from_config(mut config: ResolvedConfig) -> Self {
        if config.max_items.is_some() && config.eviction_policy.is_none() {
            config.eviction_policy = Some(EvictionPolicy::default());
        }

        debug!(
            "Cache created: max_items={:?}, eviction_policy={:?}, eviction_samples={:?}, max_age={:?}",
            config.max_items, config.eviction_policy, config.eviction_samples, config.max_age
        );

        Self {
            advisor: ExpirationAdvisor::new(config.max_age),
            config,
            store: Mutex::new(Store::new()),
        }
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    // == Get ==
    /// Retrieves a copy of the value stored under `key`.
    ///
    /// Expired entries are removed and reported as absent. A hit marks the
    /// entry as most recently used but leaves its TTL window unchanged.
    pub fn get(&self, key: &str) -> Option<T>
    where
        T: Clone,
    {
        let mut store = self.store.lock();

        let now = Instant::now();
        let entry = store.lookup(key)?;
        if self.advisor.is_expired(entry, now) {
            store.remove(key);
            trace!("Expired key '{}' removed on get", key);
            return None;
        }
        if let Some(remaining) = self.advisor.remaining(entry, now) {
            trace!("Hit on key '{}', expires in {:?}", key, remaining);
        }

        store.touch(key).map(|entry| entry.value.clone())
    }

    // == Set ==
    /// Stores a value, overwriting any existing one and restarting its TTL.
    ///
    /// If the insert pushes the cache over `max_items`, one entry chosen by
    /// the eviction policy is removed. The key being set is never the victim
    /// unless the capacity is zero.
    pub fn set(&self, key: impl Into<String>, value: T) -> Result<()> {
        let key = key.into();
        let mut store = self.store.lock();

        store.upsert(key.clone(), value);

        if let (Some(max_items), Some(policy)) =
            (self.config.max_items, self.config.eviction_policy)
        {
            if store.live_count() > max_items {
                if let Some(victim) =
                    policy.select_victim(&store, self.config.eviction_samples, &key)
                {
                    store.remove(&victim);
                    debug!(
                        "Evicted key '{}' ({} policy, max_items={})",
                        victim, policy, max_items
                    );
                }
            }
        }

        Ok(())
    }

    // == Delete ==
    /// Removes an entry by key. No-op if absent.
    pub fn delete(&self, key: &str) {
        self.store.lock().remove(key);
    }

    // == Clear ==
    /// Removes every entry.
    pub fn clear(&self) {
        self.store.lock().remove_all();
    }

    // == Sum ==
    /// Returns the number of entries that have not expired.
    ///
    /// Expired entries found during the count are removed.
    pub fn sum(&self) -> usize {
        let mut store = self.store.lock();
        self.purge(&mut store);
        store.live_count()
    }

    // == Purge Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        let mut store = self.store.lock();
        self.purge(&mut store)
    }

    fn purge(&self, store: &mut Store<T>) -> usize {
        if !self.advisor.is_enabled() {
            return 0;
        }

        let now = Instant::now();
        let removed = store.retain(|_, entry| !self.advisor.is_expired(entry, now));
        if removed > 0 {
            trace!("Purged {} expired entries", removed);
        }
        removed
    }
}
