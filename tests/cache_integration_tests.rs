//! Integration Tests for the public cache API
//!
//! Exercises Get/Set/Delete/Clear/Sum end to end through `simplecache::Cache`.

use std::sync::{Arc, Once};
use std::thread::{self, sleep};
use std::time::Duration;

use chrono::TimeDelta;
use simplecache::{Cache, CacheOptions, EvictionPolicy, KeyValueCache};

// == Helper Functions ==

static TRACING: Once = Once::new();

fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "simplecache=warn".into()),
            )
            .with_test_writer()
            .try_init();
    });
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Sample {
    key: String,
}

fn sample(key: &str) -> Sample {
    Sample {
        key: key.to_string(),
    }
}

// == Get Tests ==

#[test]
fn test_get_nothing() {
    init_tracing();
    let cache: Cache<Sample> = Cache::new();

    for i in 0..1000 {
        assert!(cache.get(&format!("key-{}", i)).is_none());
    }

    assert_eq!(cache.sum(), 0);
}

// == Set Tests ==

#[test]
fn test_default_set() {
    init_tracing();
    let cases: Vec<(&str, Vec<&str>, usize)> = vec![
        ("add one get one", vec!["test"], 1),
        ("add two check get", vec!["test1", "test2"], 2),
        ("add three check get", vec!["test1", "test2", "test3"], 3),
        ("add three duplicate get 2", vec!["test1", "test2", "test2"], 2),
        ("add three duplicate get 1", vec!["test1", "test1", "test1"], 1),
    ];

    for (name, keys, expected_count) in cases {
        let cache = Cache::new();
        for key in &keys {
            cache.set(*key, sample(key)).unwrap();
        }
        for key in &keys {
            let value = cache.get(key);
            assert_eq!(value.map(|s| s.key), Some(key.to_string()), "{}", name);
        }

        assert_eq!(cache.sum(), expected_count, "{}", name);
    }
}

#[test]
fn test_set_overwrite_returns_latest() {
    init_tracing();
    let cache = Cache::new();

    cache.set("x", 1).unwrap();
    cache.set("x", 2).unwrap();

    assert_eq!(cache.get("x"), Some(2));
    assert_eq!(cache.sum(), 1);
}

// == Capacity Tests ==

#[test]
fn test_max_items_option() {
    init_tracing();
    for max_items in [1usize, 2, 100, 50] {
        let cache = Cache::with_options(CacheOptions::new().with_max_items(max_items));

        for i in 0..max_items + 2 {
            cache.set(format!("key-{}", i), Sample::default()).unwrap();
        }

        assert_eq!(cache.sum(), max_items);
    }
}

#[test]
fn test_max_items_evicts_least_recently_set() {
    init_tracing();
    let cache = Cache::with_options(CacheOptions::new().with_max_items(3));

    for key in ["a", "b", "c", "d"] {
        cache.set(key, sample(key)).unwrap();
    }

    assert_eq!(cache.sum(), 3);
    assert!(cache.get("a").is_none());
    for key in ["b", "c", "d"] {
        assert!(cache.get(key).is_some(), "{} should remain", key);
    }
}

#[test]
fn test_lru_evicts_untouched_key() {
    init_tracing();
    let cache = Cache::with_options(
        CacheOptions::new()
            .with_max_items(5)
            .with_eviction_policy(EvictionPolicy::Lru),
    );

    for i in 0..5 {
        cache.set(format!("key-{}", i), i).unwrap();
    }
    for _ in 0..50 {
        for i in 0..4 {
            cache.set(format!("key-{}", i), i).unwrap();
        }
    }

    cache.set("key-6", 6).unwrap();

    // key-4 was the only key never refreshed
    assert!(cache.get("key-4").is_none());
    for i in [0, 1, 2, 3, 6] {
        assert_eq!(cache.get(&format!("key-{}", i)), Some(i));
    }
    assert_eq!(cache.sum(), 5);
}

#[test]
fn test_lru_get_protects_key() {
    init_tracing();
    let cache = Cache::with_options(CacheOptions::new().with_max_items(3));

    cache.set("a", 1).unwrap();
    cache.set("b", 2).unwrap();
    cache.set("c", 3).unwrap();
    assert_eq!(cache.get("a"), Some(1));

    cache.set("d", 4).unwrap();

    assert!(cache.get("b").is_none());
    assert_eq!(cache.get("a"), Some(1));
}

#[test]
fn test_sampled_eviction_keeps_capacity() {
    init_tracing();
    let cache = Cache::with_options(
        CacheOptions::new()
            .with_max_items(10)
            .with_eviction_samples(3),
    );

    for i in 0..1000 {
        cache.set(format!("key-{}", i), i).unwrap();
        assert!(cache.sum() <= 10);
        assert_eq!(cache.get(&format!("key-{}", i)), Some(i));
    }

    assert_eq!(cache.sum(), 10);
}

#[test]
fn test_zero_max_items_keeps_cache_empty() {
    init_tracing();
    let cache = Cache::with_options(CacheOptions::new().with_max_items(0));

    cache.set("x", 1).unwrap();

    assert_eq!(cache.sum(), 0);
    assert!(cache.get("x").is_none());
}

// == Option Tests ==

#[test]
fn test_all_options() {
    init_tracing();
    let cache: Cache<Sample> = Cache::with_options(
        CacheOptions::new()
            .with_max_items(5)
            .with_eviction_policy(EvictionPolicy::Lru)
            .with_eviction_samples(5)
            .with_max_age(TimeDelta::nanoseconds(1)),
    );

    let config = cache.config();
    assert_eq!(config.max_items, Some(5));
    assert_eq!(config.eviction_policy, Some(EvictionPolicy::Lru));
    assert_eq!(config.eviction_samples, Some(5));
    assert_eq!(config.max_age, Some(Duration::from_nanos(1)));
}

#[test]
fn test_options_from_json() {
    init_tracing();
    let options: CacheOptions =
        serde_json::from_str(r#"{"max_items": 2, "max_age_ms": 60000}"#).unwrap();
    let cache = Cache::with_options(options);

    for i in 0..3 {
        cache.set(format!("key-{}", i), i).unwrap();
    }

    assert_eq!(cache.config().eviction_policy, Some(EvictionPolicy::Lru));
    assert_eq!(cache.sum(), 2);
}

// == Expiration Tests ==

#[test]
fn test_expire() {
    init_tracing();
    let cache = Cache::with_options(CacheOptions::new().with_max_age(TimeDelta::nanoseconds(1)));

    cache.set("test", sample("test")).unwrap();
    sleep(Duration::from_millis(1));

    assert!(cache.get("test").is_none());
    assert_eq!(cache.sum(), 0);
}

#[test]
fn test_expire_excluded_from_sum_without_get() {
    init_tracing();
    let cache = Cache::with_options(CacheOptions::new().with_max_age(TimeDelta::milliseconds(10)));

    for i in 0..10 {
        cache.set(format!("key-{}", i), i).unwrap();
    }
    sleep(Duration::from_millis(20));

    assert_eq!(cache.sum(), 0);
}

#[test]
fn test_no_expiration() {
    init_tracing();
    for max_age in [TimeDelta::hours(-1), TimeDelta::zero()] {
        let cache = Cache::with_options(
            CacheOptions::new()
                .with_max_items(5)
                .with_eviction_policy(EvictionPolicy::Lru)
                .with_max_age(max_age),
        );

        for i in 0..5 {
            cache.set(format!("key-{}", i), i).unwrap();
        }
        sleep(Duration::from_millis(5));
        for i in 0..5 {
            assert_eq!(cache.get(&format!("key-{}", i)), Some(i));
        }
    }
}

// == Delete / Clear Tests ==

#[test]
fn test_delete() {
    init_tracing();
    for keys in [vec!["test"], vec!["test", "test2"]] {
        let cache =
            Cache::with_options(CacheOptions::new().with_max_age(TimeDelta::nanoseconds(1)));
        for key in &keys {
            cache.set(*key, sample(key)).unwrap();
        }
        for key in &keys {
            cache.delete(key);
        }

        assert_eq!(cache.sum(), 0);
    }
}

#[test]
fn test_delete_absent_key_is_noop() {
    init_tracing();
    let cache = Cache::new();
    cache.set("present", 1).unwrap();

    cache.delete("absent");

    assert_eq!(cache.sum(), 1);
    assert_eq!(cache.get("present"), Some(1));
}

#[test]
fn test_clear() {
    init_tracing();
    let cache = Cache::new();

    for i in 0..100 {
        cache.set(format!("key-{}", i), Sample::default()).unwrap();
    }

    cache.clear();
    assert_eq!(cache.sum(), 0);

    cache.clear();
    assert_eq!(cache.sum(), 0);
}

// == Concurrency Tests ==

#[test]
fn test_concurrent_access() {
    init_tracing();
    let cache = Arc::new(Cache::with_options(CacheOptions::new().with_max_items(64)));

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..500 {
                    let key = format!("key-{}-{}", t, i % 100);
                    cache.set(key.clone(), format!("value-{}", i)).unwrap();
                    if let Some(value) = cache.get(&key) {
                        assert!(value.starts_with("value-"));
                    }
                    if i % 7 == 0 {
                        cache.delete(&key);
                    }
                    assert!(cache.sum() <= 64);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread should not panic");
    }

    assert!(cache.sum() <= 64);
}

#[test]
fn test_shared_through_trait_object() {
    init_tracing();
    let cache: Arc<dyn KeyValueCache<u64>> = Arc::new(Cache::<u64>::new());

    let handles: Vec<_> = (0..4u64)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..25u64 {
                    cache.set(format!("{}-{}", t, i), i).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("Thread should not panic");
    }

    assert_eq!(cache.sum(), 100);
    assert_eq!(cache.get("3-24"), Some(24));
}
