//! Time-bounded cache for upstream responses
//!
//! Keyed by the exact request parameter tuple. An entry older than the
//! configured TTL counts as absent and gets refreshed from upstream.
//! The cache is owned by the service state and sized at startup. Two
//! identical requests racing a cold key both go upstream; the cache
//! trades that duplicate fetch for simplicity.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

/// Default freshness window for upstream responses.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Default entry bound before the oldest entries get evicted.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Whether a lookup was served from the cache or fetched upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    /// Marker value for the `X-Cache` response header.
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    payload: serde_json::Value,
    stored_at: Instant,
}

/// TTL and capacity bounded response cache.
pub struct ResponseCache {
    ttl: Duration,
    max_entries: usize,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            ttl,
            max_entries,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Look up a live entry. Expired entries count as absent; they are
    /// overwritten on the next insert rather than dropped here.
    pub async fn get(&self, key: &str) -> Option<serde_json::Value> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.payload.clone())
    }

    /// Store a payload under its parameter key, evicting expired and
    /// then oldest entries once the capacity bound is reached.
    pub async fn insert(&self, key: String, payload: serde_json::Value) {
        let mut entries = self.entries.write().await;
        if entries.len() >= self.max_entries && !entries.contains_key(&key) {
            Self::evict(&mut entries, self.ttl, self.max_entries);
        }
        entries.insert(
            key,
            CacheEntry {
                payload,
                stored_at: Instant::now(),
            },
        );
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Drop expired entries first, then the oldest until one slot is free.
    fn evict(entries: &mut HashMap<String, CacheEntry>, ttl: Duration, max_entries: usize) {
        entries.retain(|_, entry| entry.stored_at.elapsed() < ttl);
        while entries.len() >= max_entries {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.stored_at)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => entries.remove(&key),
                None => break,
            };
        }
    }
}
