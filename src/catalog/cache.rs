//! Short-TTL cache for catalog API responses.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Time source for TTL checks, injectable so expiry is testable without
/// real time passing.
pub trait Clock: Send + Sync {
    /// Milliseconds since the UNIX epoch.
    fn now_ms(&self) -> i64;
}

/// Wall-clock time.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX epoch")
            .as_millis() as i64
    }
}

struct CacheEntry {
    payload: String,
    stored_at: i64,
}

/// Best-effort response cache keyed by serialized query parameters.
///
/// At most one entry per key; expiry is checked at read time and there is
/// no other eviction. The cache is advisory: a miss only costs a redundant
/// fetch, so a poisoned lock degrades to a miss instead of an error.
pub struct ResponseCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl_ms: i64,
    clock: Box<dyn Clock>,
}

impl ResponseCache {
    pub fn new(ttl_ms: i64) -> Self {
        Self::with_clock(ttl_ms, Box::new(SystemClock))
    }

    pub fn with_clock(ttl_ms: i64, clock: Box<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl_ms,
            clock,
        }
    }

    /// Returns the cached payload if present and within TTL.
    pub fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().ok()?;
        let entry = entries.get(key)?;
        if self.clock.now_ms() - entry.stored_at < self.ttl_ms {
            Some(entry.payload.clone())
        } else {
            None
        }
    }

    /// Stores `payload` under `key`, replacing any previous entry.
    pub fn put(&self, key: &str, payload: String) {
        let Ok(mut entries) = self.entries.lock() else {
            return;
        };
        let stored_at = self.clock.now_ms();
        entries.insert(key.to_string(), CacheEntry { payload, stored_at });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicI64, Ordering};

    #[derive(Clone, Default)]
    struct ManualClock(Arc<AtomicI64>);

    impl ManualClock {
        fn advance(&self, ms: i64) {
            self.0.fetch_add(ms, Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now_ms(&self) -> i64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    #[test]
    fn get_returns_stored_payload_within_ttl() {
        let clock = ManualClock::default();
        let cache = ResponseCache::with_clock(1000, Box::new(clock.clone()));

        cache.put("key", "payload".to_string());
        clock.advance(999);

        assert_eq!(cache.get("key"), Some("payload".to_string()));
    }

    #[test]
    fn get_misses_after_ttl_expiry() {
        let clock = ManualClock::default();
        let cache = ResponseCache::with_clock(1000, Box::new(clock.clone()));

        cache.put("key", "payload".to_string());
        clock.advance(1000);

        assert_eq!(cache.get("key"), None);
    }

    #[test]
    fn get_misses_for_unknown_key() {
        let cache = ResponseCache::new(1000);
        assert_eq!(cache.get("unknown"), None);
    }

    #[test]
    fn put_replaces_the_previous_entry() {
        let clock = ManualClock::default();
        let cache = ResponseCache::with_clock(1000, Box::new(clock.clone()));

        cache.put("key", "stale".to_string());
        clock.advance(500);
        cache.put("key", "fresh".to_string());
        clock.advance(999);

        assert_eq!(cache.get("key"), Some("fresh".to_string()));
    }

    #[test]
    fn entries_are_keyed_independently() {
        let cache = ResponseCache::new(1000);
        cache.put("a", "1".to_string());
        cache.put("b", "2".to_string());
        assert_eq!(cache.get("a"), Some("1".to_string()));
        assert_eq!(cache.get("b"), Some("2".to_string()));
    }
}
