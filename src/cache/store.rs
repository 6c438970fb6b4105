//! Key/value cache with time-based expiry.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use metrics::counter;

use super::clock::Clock;
use super::lock::{rw_read, rw_write};

const SOURCE: &str = "cache::store";

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// Memoizes an expensive per-key computation for a bounded time window.
///
/// An unexpired hit is served under a shared lock so readers never block
/// each other. Concurrent misses on the same key may each run the
/// computation; whichever insert lands last wins, which is acceptable
/// because the computation is cheap and idempotent. No single-flight
/// deduplication is attempted.
pub struct TtlCache<V> {
    entries: RwLock<HashMap<String, Entry<V>>>,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Return the cached value for `key`, or run `compute`, store its result
    /// for `ttl`, and return it.
    ///
    /// A failed computation is never stored; the error surfaces to the
    /// current caller and the next call retries.
    pub async fn get_or_try_compute<F, Fut, E>(
        &self,
        key: &str,
        ttl: Duration,
        compute: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let now = self.clock.now();
        if let Some(value) = self.lookup(key, now) {
            counter!("foglio_cache_hit_total").increment(1);
            return Ok(value);
        }
        counter!("foglio_cache_miss_total").increment(1);

        let value = compute().await?;

        let mut guard = rw_write(&self.entries, SOURCE, "get_or_try_compute.insert");
        guard.insert(
            key.to_string(),
            Entry {
                value: value.clone(),
                expires_at: now + ttl,
            },
        );
        Ok(value)
    }

    /// Unexpired value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<V> {
        self.lookup(key, self.clock.now())
    }

    pub fn invalidate(&self, key: &str) {
        rw_write(&self.entries, SOURCE, "invalidate").remove(key);
    }

    pub fn clear(&self) {
        rw_write(&self.entries, SOURCE, "clear").clear();
    }

    fn lookup(&self, key: &str, now: Instant) -> Option<V> {
        let guard = rw_read(&self.entries, SOURCE, "lookup");
        guard
            .get(key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.value.clone())
    }
}
