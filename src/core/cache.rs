//! In-memory cache whose entries expire when the calendar month rolls over.

use chrono::{Datelike, NaiveDateTime};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: NaiveDateTime,
}

impl<V> CacheEntry<V> {
    /// An entry stays fresh for the rest of the (year, month) it was stored in.
    fn is_fresh(&self, now: NaiveDateTime) -> bool {
        self.stored_at.year() == now.year() && self.stored_at.month() == now.month()
    }
}

/// Key-value store with coarse, calendar-month expiration.
///
/// Expired entries are not swept; they are dropped by the first `get` that observes them.
/// Both operations take the current time explicitly so callers decide what "now" is.
pub struct MonthlyCache<K, V> {
    inner: Mutex<HashMap<K, CacheEntry<V>>>,
}

impl<K, V> MonthlyCache<K, V>
where
    K: Eq + Hash + Debug + Send + Sync,
    V: Clone + Send + Sync,
{
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the value for `key` if it was stored in the same month as `now`.
    ///
    /// A stale entry is removed as a side effect.
    pub async fn get(&self, key: &K, now: NaiveDateTime) -> Option<V> {
        let mut cache = self.inner.lock().await;
        let entry = match cache.get(key) {
            Some(entry) => entry,
            None => {
                debug!("Cache MISS for key: {:?}", key);
                return None;
            }
        };

        if entry.is_fresh(now) {
            debug!("Cache HIT for key: {:?}", key);
            return Some(entry.value.clone());
        }

        debug!(stored_at = %entry.stored_at, "Cache entry expired for key: {:?}", key);
        cache.remove(key);
        None
    }

    /// Inserts or replaces the entry for `key`, stamped with `now`.
    pub async fn set(&self, key: K, value: V, now: NaiveDateTime) {
        let mut cache = self.inner.lock().await;
        debug!("Cache PUT for key: {:?}", key);
        cache.insert(
            key,
            CacheEntry {
                value,
                stored_at: now,
            },
        );
    }

    /// Number of physically present entries, including ones not yet evicted.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<K, V> Default for MonthlyCache<K, V>
where
    K: Eq + Hash + Debug + Send + Sync,
    V: Clone + Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}
