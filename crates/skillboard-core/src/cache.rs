//! Short-lived in-memory cache of leaderboard responses

use std::collections::HashMap;

use crate::filter::CacheKey;
use crate::model::LeaderboardResponse;

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub payload: LeaderboardResponse,
    /// Client time (ms since the epoch) the payload arrived
    pub fetched_at_ms: f64,
}

impl CacheEntry {
    fn age_ms(&self, now_ms: f64) -> f64 {
        now_ms - self.fetched_at_ms
    }
}

/// Responses keyed by (filter, limit).
///
/// Entries younger than the TTL are served without a request. Entries older
/// than twice the TTL are dropped by [`ResponseCache::sweep`].
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: HashMap<CacheKey, CacheEntry>,
    ttl_ms: f64,
}

impl ResponseCache {
    pub fn new(ttl_ms: f64) -> Self {
        Self {
            entries: HashMap::new(),
            ttl_ms,
        }
    }

    /// Fresh entry for `key`, if any
    pub fn get(&self, key: &CacheKey, now_ms: f64) -> Option<&CacheEntry> {
        self.entries
            .get(key)
            .filter(|entry| entry.age_ms(now_ms) < self.ttl_ms)
    }

    pub fn insert(&mut self, key: CacheKey, payload: LeaderboardResponse, now_ms: f64) {
        self.entries.insert(
            key,
            CacheEntry {
                payload,
                fetched_at_ms: now_ms,
            },
        );
    }

    /// Drop entries older than twice the TTL, returning how many went
    pub fn sweep(&mut self, now_ms: f64) -> usize {
        let before = self.entries.len();
        let max_age = self.ttl_ms * 2.0;
        self.entries.retain(|_, entry| entry.age_ms(now_ms) <= max_age);
        before - self.entries.len()
    }

    /// Whether `key` is held at all, fresh or not
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
