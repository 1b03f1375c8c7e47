//! Configuration Module
//!
//! Caller-supplied cache options and their one-time resolution into the
//! settings the cache runs with.

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::cache::EvictionPolicy;
use crate::error::{CacheError, Result};

// == Environment Variables ==
pub const ENV_MAX_ITEMS: &str = "SIMPLECACHE_MAX_ITEMS";
pub const ENV_EVICTION_POLICY: &str = "SIMPLECACHE_EVICTION_POLICY";
pub const ENV_EVICTION_SAMPLES: &str = "SIMPLECACHE_EVICTION_SAMPLES";
pub const ENV_MAX_AGE_MS: &str = "SIMPLECACHE_MAX_AGE_MS";

/// Optional cache settings. Every field left unset falls back to a default.
///
/// An empty `CacheOptions` gives an unbounded cache whose entries never expire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheOptions {
    /// Maximum number of entries, unset = unbounded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
    /// Victim selection strategy, only used when `max_items` is set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eviction_policy: Option<EvictionPolicy>,
    /// Keys sampled per eviction, unset = all keys
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eviction_samples: Option<usize>,
    /// Entry time-to-live. Zero or negative disables expiration.
    #[serde(
        rename = "max_age_ms",
        with = "max_age_millis",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_age: Option<TimeDelta>,
}

impl CacheOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = Some(max_items);
        self
    }

    pub fn with_eviction_policy(mut self, policy: EvictionPolicy) -> Self {
        self.eviction_policy = Some(policy);
        self
    }

    pub fn with_eviction_samples(mut self, samples: usize) -> Self {
        self.eviction_samples = Some(samples);
        self
    }

    pub fn with_max_age(mut self, max_age: TimeDelta) -> Self {
        self.max_age = Some(max_age);
        self
    }

    /// Loads options from environment variables.
    ///
    /// # Environment Variables
    /// - `SIMPLECACHE_MAX_ITEMS` - Maximum entries (default: unbounded)
    /// - `SIMPLECACHE_EVICTION_POLICY` - `lru` (default when bounded)
    /// - `SIMPLECACHE_EVICTION_SAMPLES` - Keys sampled per eviction (default: all)
    /// - `SIMPLECACHE_MAX_AGE_MS` - TTL in milliseconds, <= 0 disables (default: disabled)
    ///
    /// Unset or blank variables stay unset; malformed values are an error.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`CacheOptions::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_age = parse_var::<i64, _>(&lookup, ENV_MAX_AGE_MS)?
            .map(|ms| {
                TimeDelta::try_milliseconds(ms).ok_or_else(|| {
                    CacheError::InvalidConfig(format!("{}: {} is out of range", ENV_MAX_AGE_MS, ms))
                })
            })
            .transpose()?;

        Ok(Self {
            max_items: parse_var(&lookup, ENV_MAX_ITEMS)?,
            eviction_policy: parse_var(&lookup, ENV_EVICTION_POLICY)?,
            eviction_samples: parse_var(&lookup, ENV_EVICTION_SAMPLES)?,
            max_age,
        })
    }

    // == Resolve ==
    /// Applies defaults. Never fails: zero or negative ages and zero sample
    /// sizes degrade to "disabled" and "all keys".
    pub fn resolve(&self) -> ResolvedConfig {
        ResolvedConfig {
            max_items: self.max_items,
            eviction_policy: self
                .max_items
                .map(|_| self.eviction_policy.unwrap_or_default()),
            eviction_samples: self.eviction_samples.filter(|&n| n > 0),
            max_age: self
                .max_age
                .and_then(|age| age.to_std().ok())
                .filter(|age| !age.is_zero()),
        }
    }
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| CacheError::InvalidConfig(format!("{}={:?}: {}", name, raw, e))),
        _ => Ok(None),
    }
}

/// Settings the cache runs with, fixed at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Maximum number of entries, `None` = unbounded
    pub max_items: Option<usize>,
    /// Set exactly when `max_items` is set
    pub eviction_policy: Option<EvictionPolicy>,
    /// Keys sampled per eviction, `None` = all
    pub eviction_samples: Option<usize>,
    /// Strictly positive TTL, `None` = entries never expire
    pub max_age: Option<Duration>,
}

impl From<CacheOptions> for ResolvedConfig {
    fn from(options: CacheOptions) -> Self {
        options.resolve()
    }
}

/// Serializes `max_age` as signed milliseconds.
mod max_age_millis {
    use chrono::TimeDelta;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<TimeDelta>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(age) => serializer.serialize_some(&age.num_milliseconds()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<TimeDelta>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<i64>::deserialize(deserializer)?
            .map(|ms| {
                TimeDelta::try_milliseconds(ms)
                    .ok_or_else(|| D::Error::custom(format!("max_age_ms {} is out of range", ms)))
            })
            .transpose()
    }
}
