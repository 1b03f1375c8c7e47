//! Expiration Module
//!
//! Decides whether an entry has outlived the configured maximum age.

use std::time::{Duration, Instant};

use crate::cache::CacheEntry;

// == Expiration Advisor ==
/// Stateless TTL rule shared by every lookup.
///
/// TTL is absolute: it is measured from the last `set` of a key, so reading
/// an entry never extends or shortens its lifetime.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpirationAdvisor {
    /// Maximum age, `None` = expiration disabled
    max_age: Option<Duration>,
}

impl ExpirationAdvisor {
    // == Constructor ==
    /// Creates an advisor. A zero duration disables expiration.
    pub fn new(max_age: Option<Duration>) -> Self {
        Self {
            max_age: max_age.filter(|age| !age.is_zero()),
        }
    }

    // == Is Expired ==
    /// Checks if the entry is stale at `now`.
    ///
    /// Boundary condition: an entry whose age equals the maximum age is
    /// already expired.
    pub fn is_expired<T>(&self, entry: &CacheEntry<T>, now: Instant) -> bool {
        match self.max_age {
            Some(max_age) => entry.age(now) >= max_age,
            None => false,
        }
    }

    // == Remaining ==
    /// Time left before the entry expires, or None if expiration is disabled.
    ///
    /// Returns `Some(Duration::ZERO)` for an entry that has already expired.
    pub fn remaining<T>(&self, entry: &CacheEntry<T>, now: Instant) -> Option<Duration> {
        self.max_age
            .map(|max_age| max_age.saturating_sub(entry.age(now)))
    }

    /// Returns true if entries can expire at all.
    pub fn is_enabled(&self) -> bool {
        self.max_age.is_some()
    }
}
