use crate::config::{CacheConfig, ConfigError};
use crate::store::{CacheStats, Store};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Process-wide response cache handle.
///
/// Clones share one underlying store behind a single coarse mutex — `get`
/// mutates too (lazy expiry, counters), so there is nothing to gain from
/// shared read access at this traffic level. Construct the cache once and
/// hand clones to the request-handling layer and the sweeper; there is no
/// global instance.
pub struct ResponseCache<T> {
    shared: Arc<Shared<T>>,
}

struct Shared<T> {
    store: Mutex<Store<T>>,
    cleanup_interval: Duration,
}

impl<T> Clone for ResponseCache<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> Default for ResponseCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ResponseCache<T> {
    /// Cache with the default configuration: 100 entries, 600s TTL, 300s
    /// sweep period.
    pub fn new() -> Self {
        Self::build(CacheConfig::default())
    }

    /// Cache with explicit configuration. Zero-valued options are rejected
    /// here; every runtime operation after this point is total.
    pub fn with_config(config: CacheConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: CacheConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                store: Mutex::new(Store::new(config.max_size, config.expiry())),
                cleanup_interval: config.cleanup_interval(),
            }),
        }
    }

    /// Look up a fingerprint. Returns the cached payload if present and
    /// fresh; a stale entry is removed and reported as a miss.
    pub fn get(&self, key: &str) -> Option<Arc<T>> {
        self.shared.store.lock().get(key)
    }

    /// Insert or overwrite a fingerprint with the current timestamp.
    /// Inserting a new key at capacity evicts the oldest-inserted entry
    /// first; an overwrite never evicts.
    pub fn insert(&self, key: impl Into<String>, value: T) {
        self.shared.store.lock().insert(key.into(), value);
    }

    /// Drop a fingerprint explicitly. Returns whether it was present.
    pub fn remove(&self, key: &str) -> bool {
        self.shared.store.lock().remove(key)
    }

    /// One sweep pass over the whole store; returns the number of entries
    /// removed. The background sweeper calls this on its period, but it is
    /// also safe to call directly.
    pub fn remove_expired(&self) -> usize {
        self.shared.store.lock().remove_expired()
    }

    /// Remove all entries.
    pub fn clear(&self) {
        self.shared.store.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.shared.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.shared.store.lock().capacity()
    }

    /// Current statistics snapshot.
    pub fn stats(&self) -> CacheStats {
        self.shared.store.lock().stats()
    }

    pub(crate) fn cleanup_interval(&self) -> Duration {
        self.shared.cleanup_interval
    }

    #[cfg(test)]
    pub(crate) fn backdate(&self, key: &str, by: Duration) {
        self.shared.store.lock().backdate(key, by);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hit_and_miss() {
        let cache = ResponseCache::new();
        let key = "fingerprint";
        assert!(cache.get(key).is_none());

        cache.insert(key, json!({"results": [{"id": "tt0111161"}]}));
        let hit = cache.get(key).expect("fresh entry");
        assert_eq!(hit["results"][0]["id"], "tt0111161");
    }

    #[test]
    fn rejects_zero_config() {
        let config = CacheConfig {
            max_size: 0,
            ..CacheConfig::default()
        };
        assert!(ResponseCache::<String>::with_config(config).is_err());
    }

    #[test]
    fn clones_share_state() {
        let cache = ResponseCache::new();
        let other = cache.clone();
        cache.insert("k", "v".to_string());
        assert!(other.get("k").is_some());
        assert_eq!(other.len(), 1);
    }

    #[test]
    fn fifo_eviction_scenario() {
        let config = CacheConfig {
            max_size: 2,
            ..CacheConfig::default()
        };
        let cache = ResponseCache::with_config(config).unwrap();
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("c", 3);

        assert!(cache.get("a").is_none());
        assert_eq!(cache.get("b").as_deref(), Some(&2));
        assert_eq!(cache.get("c").as_deref(), Some(&3));
    }

    #[test]
    fn short_ttl_expires() {
        let config = CacheConfig {
            expiry_seconds: 1,
            ..CacheConfig::default()
        };
        let cache = ResponseCache::with_config(config).unwrap();
        cache.insert("x", "v".to_string());
        cache.backdate("x", Duration::from_secs(2));

        assert!(cache.get("x").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn concurrent_access() {
        use std::thread;

        let config = CacheConfig {
            max_size: 64,
            ..CacheConfig::default()
        };
        let cache = ResponseCache::with_config(config).unwrap();

        let mut handles = vec![];
        for t in 0..8 {
            let cache = cache.clone();
            handles.push(thread::spawn(move || {
                for i in 0..1000 {
                    let key = format!("key-{}", (t * 1000 + i) % 200);
                    if i % 3 == 0 {
                        cache.insert(key, i);
                    } else {
                        cache.get(&key);
                    }
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }

        // Should not panic or deadlock, and the size bound must hold.
        assert!(cache.len() <= cache.capacity());
        let stats = cache.stats();
        assert!(stats.hits + stats.misses > 0);
    }

    #[test]
    fn is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ResponseCache<serde_json::Value>>();
    }
}
