//! Cache contract shared by embedding components.

use crate::cache::Cache;
use crate::error::Result;

/// The five operations an embedding component may rely on.
///
/// Object safe, so callers can hold a `Box<dyn KeyValueCache<T>>` or
/// `Arc<dyn KeyValueCache<T>>` instead of the concrete cache type.
pub trait KeyValueCache<T>: Send + Sync {
    /// Returns a copy of the live value under `key`.
    fn get(&self, key: &str) -> Option<T>;

    /// Inserts or overwrites `key`. The error outcome is reserved for key validation.
    fn set(&self, key: String, value: T) -> Result<()>;

    /// Removes `key` if present.
    fn delete(&self, key: &str);

    /// Removes every entry.
    fn clear(&self);

    /// Number of entries that have not expired.
    fn sum(&self) -> usize;
}

impl<T> KeyValueCache<T> for Cache<T>
where
    T: Clone + Send,
{
    fn get(&self, key: &str) -> Option<T> {
        Cache::get(self, key)
    }

    fn set(&self, key: String, value: T) -> Result<()> {
        Cache::set(self, key, value)
    }

    fn delete(&self, key: &str) {
        Cache::delete(self, key)
    }

    fn clear(&self) {
        Cache::clear(self)
    }

    fn sum(&self) -> usize {
        Cache::sum(self)
    }
}
