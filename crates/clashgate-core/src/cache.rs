//! In-memory TTL caching for API read responses.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Monotonic time source used to stamp and expire cache entries.
pub trait Clock: Send + Sync + Debug {
    /// Elapsed time since an arbitrary but fixed origin.
    fn now(&self) -> Duration;
}

/// Wall-independent clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven clock for deterministic expiry tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *now += by;
    }

    pub fn set(&self, at: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *now = at;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    expires_at: Duration,
    value: V,
}

#[derive(Debug)]
struct CacheInner<V> {
    enabled: bool,
    map: HashMap<String, CacheEntry<V>>,
}

/// Thread-safe key/value cache with per-entry absolute expiry.
///
/// Expired entries are only dropped when a lookup touches them; there is no
/// background sweeper and no capacity bound.
#[derive(Debug)]
pub struct TtlCache<V> {
    inner: Mutex<CacheInner<V>>,
    default_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> TtlCache<V> {
    /// Create a cache driven by the system clock.
    pub fn new(enabled: bool, default_ttl: Duration) -> Self {
        Self::with_clock(enabled, default_ttl, Arc::new(SystemClock::new()))
    }

    pub fn with_clock(enabled: bool, default_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                enabled,
                map: HashMap::new(),
            }),
            default_ttl,
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner<V>> {
        // Entries are inserted whole, so a poisoned map is still consistent.
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Get a live value for `key`.
    ///
    /// Returns `None` when the cache is disabled, the key is unknown, or the
    /// entry expired. An expired entry is evicted on the way out.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut store = self.lock();
        if !store.enabled {
            return None;
        }

        let now = self.clock.now();
        match store.map.get(key) {
            Some(entry) if entry.expires_at > now => Some(entry.value.clone()),
            Some(_) => {
                store.map.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store `value` under `key`, replacing any previous entry.
    ///
    /// No-op when the cache is disabled or the effective TTL is zero.
    pub fn set(&self, key: impl Into<String>, value: V, ttl_override: Option<Duration>) {
        let ttl = ttl_override.unwrap_or(self.default_ttl);
        let mut store = self.lock();
        if !store.enabled || ttl.is_zero() {
            return;
        }

        let expires_at = self.clock.now().saturating_add(ttl);
        store.map.insert(key.into(), CacheEntry { expires_at, value });
    }

    pub fn clear(&self) {
        self.lock().map.clear();
    }

    pub fn is_enabled(&self) -> bool {
        self.lock().enabled
    }

    /// Toggle caching. Disabling drops every stored entry immediately.
    pub fn set_enabled(&self, enabled: bool) {
        let mut store = self.lock();
        store.enabled = enabled;
        if !enabled {
            store.map.clear();
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.lock().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manual_cache(ttl: Duration) -> (TtlCache<String>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let cache = TtlCache::with_clock(true, ttl, clock.clone());
        (cache, clock)
    }

    #[test]
    fn test_cache_basic_operations() {
        let (cache, _clock) = manual_cache(Duration::from_secs(1));

        assert!(cache.get("key1").is_none());

        cache.set("key1", "value1".to_string(), None);
        assert_eq!(cache.get("key1"), Some("value1".to_string()));

        cache.set("key1", "value2".to_string(), None);
        assert_eq!(cache.get("key1"), Some("value2".to_string()));
    }

    #[test]
    fn test_cache_expiration_is_inclusive() {
        let (cache, clock) = manual_cache(Duration::from_secs(1));

        cache.set("key1", "value1".to_string(), None);
        clock.advance(Duration::from_millis(999));
        assert!(cache.get("key1").is_some());

        clock.advance(Duration::from_millis(1));
        assert!(cache.get("key1").is_none());
        assert_eq!(cache.len(), 0, "expired entry should be evicted on read");
    }

    #[test]
    fn test_cache_ttl_override() {
        let (cache, clock) = manual_cache(Duration::from_secs(60));

        cache.set("key1", "value1".to_string(), Some(Duration::from_secs(2)));
        clock.advance(Duration::from_secs(2));
        assert!(cache.get("key1").is_none());
    }

    #[test]
    fn test_cache_zero_ttl_is_noop() {
        let (cache, _clock) = manual_cache(Duration::ZERO);

        cache.set("key1", "value1".to_string(), None);
        assert!(cache.is_empty());

        cache.set("key1", "value1".to_string(), Some(Duration::from_secs(5)));
        assert_eq!(cache.get("key1"), Some("value1".to_string()));
    }

    #[test]
    fn test_cache_clear_all() {
        let (cache, _clock) = manual_cache(Duration::from_secs(60));

        cache.set("key1", "value1".to_string(), None);
        cache.set("key2", "value2".to_string(), None);
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_disabling_drops_entries_until_repopulated() {
        let (cache, _clock) = manual_cache(Duration::from_secs(60));
        cache.set("key1", "value1".to_string(), None);

        cache.set_enabled(false);
        assert!(!cache.is_enabled());
        assert!(cache.is_empty());
        cache.set("key2", "value2".to_string(), None);
        assert!(cache.get("key2").is_none());

        cache.set_enabled(true);
        assert!(cache.get("key1").is_none());
        cache.set("key1", "fresh".to_string(), None);
        assert_eq!(cache.get("key1"), Some("fresh".to_string()));
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let first = clock.now();
        assert!(clock.now() >= first);
    }
}
