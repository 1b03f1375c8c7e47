//! Sampled LRU Module
//!
//! Approximate least-recently-used victim selection over a random sample.

use rand::seq::index;

use crate::cache::Store;

// == Sampled LRU ==
/// Picks the oldest entry out of a uniform random sample of keys.
///
/// No recency list is maintained. Keys are drawn by slab position, so a
/// sampled selection costs time proportional to the sample size. With
/// `samples` unset (or at least the candidate count) every key is
/// considered and the choice is exact LRU.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SampledLru {
    /// Keys considered per selection, `None` = all
    samples: Option<usize>,
}

impl SampledLru {
    // == Constructor ==
    /// Creates a selector. A sample size of zero means all keys.
    pub fn new(samples: Option<usize>) -> Self {
        Self {
            samples: samples.filter(|&n| n > 0),
        }
    }

    // == Select Victim ==
    /// Returns the key to evict, never `protected` unless it is the only entry.
    ///
    /// Ties on recency go to the lexicographically smallest key.
    pub fn select_victim<T>(&self, store: &Store<T>, protected: &str) -> Option<String> {
        let len = store.live_count();
        let has_protected = store.lookup(protected).is_some();
        let candidate_count = len - usize::from(has_protected);

        if candidate_count == 0 {
            // Only the protected key is left (capacity of zero)
            return has_protected.then(|| protected.to_string());
        }

        let sampled: Vec<&str> = match self.samples {
            Some(k) if k < candidate_count => {
                // One spare draw covers hitting the protected key
                let amount = (k + usize::from(has_protected)).min(len);
                index::sample(&mut rand::rng(), len, amount)
                    .into_iter()
                    .filter_map(|i| store.key_at(i))
                    .filter(|key| *key != protected)
                    .take(k)
                    .collect()
            }
            _ => store.keys().filter(|key| *key != protected).collect(),
        };

        sampled
            .into_iter()
            .filter_map(|key| store.lookup(key).map(|entry| (key, entry)))
            .min_by(|(key_a, entry_a), (key_b, entry_b)| {
                entry_a
                    .recency()
                    .cmp(&entry_b.recency())
                    .then_with(|| key_a.cmp(key_b))
            })
            .map(|(key, _)| key.to_string())
    }
}
