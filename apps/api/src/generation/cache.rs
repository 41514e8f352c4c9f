#![allow(dead_code)]

//! Generation cache — an explicit time-indexed store for recent results.
//!
//! Memoizes generated tweet batches by request parameters so identical
//! requests inside the freshness window do not hit the provider again.
//! Lifecycle: constructed once at process start, entries inserted or
//! overwritten on generation, expired entries evicted on access and swept
//! on every write. Unbounded by entry count; the sweep is the only cleanup.
//!
//! The key deliberately excludes `count` — a hit is returned even when the
//! caller asked for a different number of variations. See DESIGN.md.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::Serialize;

/// How long a cached result stays eligible to be returned.
pub const FRESHNESS_WINDOW: Duration = Duration::from_secs(5 * 60);

/// The fields that identify a generation request for memoization purposes.
/// Serialized to canonical JSON to form the cache key; `count` is excluded.
#[derive(Debug, Serialize)]
pub struct CacheKey<'a> {
    pub topic: &'a str,
    pub mood: &'a str,
    pub hashtags: &'a [String],
    pub tone: &'a str,
    pub language: &'a str,
    pub length: &'a str,
    pub emojis: &'a [String],
}

impl CacheKey<'_> {
    /// Deterministic serialization — serde_json preserves struct field order.
    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

struct CacheEntry {
    tweets: Vec<String>,
    created_at: Instant,
}

/// Process-wide tweet generation cache. Held in `AppState` behind an `Arc`.
///
/// Uses a plain mutex: critical sections are a map lookup or a sweep over a
/// small map, never held across an await point.
pub struct TweetCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl TweetCache {
    pub fn new() -> Self {
        Self::with_ttl(FRESHNESS_WINDOW)
    }

    /// Constructs a cache with a custom freshness window. Tests use this to
    /// exercise expiry without waiting out the real window.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Returns the cached tweets for `key` if the entry is still fresh.
    /// An expired hit is evicted on access.
    pub fn get(&self, key: &str) -> Option<Vec<String>> {
        let mut entries = self.lock();
        match entries.get(key) {
            Some(entry) if entry.created_at.elapsed() < self.ttl => Some(entry.tweets.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Stores a fresh result under `key`, overwriting any prior entry, then
    /// sweeps every expired entry from the map.
    pub fn insert(&self, key: String, tweets: Vec<String>) {
        let mut entries = self.lock();
        entries.insert(
            key,
            CacheEntry {
                tweets,
                created_at: Instant::now(),
            },
        );
        let ttl = self.ttl;
        entries.retain(|_, entry| entry.created_at.elapsed() < ttl);
    }

    /// Number of live entries, including any not yet swept.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, CacheEntry>> {
        // A poisoned lock only means another handler panicked mid-insert;
        // the map itself is still usable.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for TweetCache {
    fn default() -> Self {
        Self::new()
    }
}
