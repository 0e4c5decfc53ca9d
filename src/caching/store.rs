//! # TTL Cache Store
//!
//! In-memory cache keyed by canonical key strings, honoring a per-entry
//! time-to-live. Stale entries are treated as absent: the read that observes
//! one deletes it. A periodic [`purge_expired`](TtlCache::purge_expired)
//! sweep (driven by the owning client) removes entries no read touches.
//!
//! Payloads are stored as `Arc<serde_json::Value>` snapshots, so repeated
//! hits hand out the same reference without re-serializing.
//!
//! All operations are pure in-memory mutations and never fail.

use crate::caching::invalidation::InvalidationRule;
use crate::core::config::CacheSettings;
use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// A single cached payload with its freshness bookkeeping
struct CacheEntry {
    payload: Arc<Value>,
    stored_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        self.stored_at.elapsed() >= self.ttl
    }
}

/// Point-in-time cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Fresh reads served from the store
    pub hits: u64,

    /// Reads that found nothing usable
    pub misses: u64,

    /// Entries removed because a read or sweep found them stale
    pub expired: u64,

    /// Entries removed by invalidation
    pub invalidated: u64,

    /// Entries currently stored (fresh and not-yet-observed stale)
    pub entries: usize,
}

/// In-memory TTL cache store
///
/// One instance is shared by all service handles of an [`ApiClient`]
/// (crate::ApiClient); tests construct isolated instances directly.
pub struct TtlCache {
    settings: CacheSettings,
    entries: DashMap<String, CacheEntry>,
    hits: AtomicU64,
    misses: AtomicU64,
    expired: AtomicU64,
    invalidated: AtomicU64,
}

impl TtlCache {
    /// Create a cache with the given settings
    pub fn new(settings: CacheSettings) -> Self {
        Self {
            settings,
            entries: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            expired: AtomicU64::new(0),
            invalidated: AtomicU64::new(0),
        }
    }

    /// The TTL applied by [`set`](Self::set)
    pub fn default_ttl(&self) -> Duration {
        self.settings.default_ttl
    }

    /// Return the payload for `key` if present and fresh
    ///
    /// A stale entry is removed on the spot and reported as a miss.
    pub fn get(&self, key: &str) -> Option<Arc<Value>> {
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                let payload = entry.payload.clone();
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(payload)
            }
            Some(entry) => {
                drop(entry);
                self.entries.remove(key);
                self.expired.fetch_add(1, Ordering::Relaxed);
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store `payload` under `key` with the default TTL, overwriting any
    /// prior entry
    pub fn set<K: Into<String>>(&self, key: K, payload: Value) {
        self.set_with_ttl(key, payload, self.settings.default_ttl);
    }

    /// Store `payload` under `key` with an explicit TTL
    pub fn set_with_ttl<K: Into<String>>(&self, key: K, payload: Value, ttl: Duration) {
        let key = key.into();

        // The entry cap is advisory: when full, reclaim expired entries and
        // accept the write either way.
        if self.entries.len() >= self.settings.max_entries && !self.entries.contains_key(&key) {
            let purged = self.purge_expired();
            if purged > 0 {
                debug!(purged, "cache at capacity, purged expired entries");
            }
        }

        self.entries.insert(
            key,
            CacheEntry {
                payload: Arc::new(payload),
                stored_at: Instant::now(),
                ttl,
            },
        );
    }

    /// Remove every entry whose key satisfies `predicate`; returns how many
    /// were removed
    pub fn invalidate<F: Fn(&str) -> bool>(&self, predicate: F) -> usize {
        let matching: Vec<String> = self
            .entries
            .iter()
            .filter(|entry| predicate(entry.key()))
            .map(|entry| entry.key().clone())
            .collect();

        let mut removed = 0;
        for key in matching {
            if self.entries.remove(&key).is_some() {
                removed += 1;
            }
        }

        if removed > 0 {
            self.invalidated.fetch_add(removed as u64, Ordering::Relaxed);
            debug!(removed, "invalidated cache entries");
        }
        removed
    }

    /// Remove every entry matched by `rule`
    pub fn invalidate_matching(&self, rule: &InvalidationRule) -> usize {
        self.invalidate(|key| rule.matches(key))
    }

    /// Remove all entries unconditionally
    pub fn clear(&self) {
        let count = self.entries.len();
        self.entries.clear();
        if count > 0 {
            debug!(count, "cleared cache");
        }
    }

    /// Remove every expired entry; returns how many were removed
    pub fn purge_expired(&self) -> usize {
        let stale: Vec<String> = self
            .entries
            .iter()
            .filter(|entry| entry.value().is_expired())
            .map(|entry| entry.key().clone())
            .collect();

        let mut removed = 0;
        for key in stale {
            if self.entries.remove(&key).is_some() {
                removed += 1;
            }
        }

        if removed > 0 {
            self.expired.fetch_add(removed as u64, Ordering::Relaxed);
            debug!(removed, "purged expired cache entries");
        }
        removed
    }

    /// Number of stored entries, including not-yet-observed stale ones
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of the store's counters
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            expired: self.expired.load(Ordering::Relaxed),
            invalidated: self.invalidated.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::time::sleep;

    fn test_cache() -> TtlCache {
        TtlCache::new(CacheSettings {
            default_ttl: Duration::from_secs(60),
            max_entries: 100,
            sweep_interval: Duration::from_secs(60),
        })
    }

    #[test]
    fn test_set_then_get_returns_payload() {
        let cache = test_cache();
        cache.set("comments:post:P1:list?page=1", json!({"items": []}));

        let payload = cache.get("comments:post:P1:list?page=1").unwrap();
        assert_eq!(*payload, json!({"items": []}));
    }

    #[test]
    fn test_repeated_hits_share_the_same_reference() {
        let cache = test_cache();
        cache.set("k", json!(42));

        let first = cache.get("k").unwrap();
        let second = cache.get("k").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_overwrite_replaces_payload() {
        let cache = test_cache();
        cache.set("k", json!(1));
        cache.set("k", json!(2));
        assert_eq!(*cache.get("k").unwrap(), json!(2));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_expired_entry_is_absent_and_removed() {
        let cache = test_cache();
        cache.set_with_ttl("k", json!("v"), Duration::from_millis(40));

        assert!(cache.get("k").is_some());
        sleep(Duration::from_millis(60)).await;

        assert!(cache.get("k").is_none());
        assert_eq!(cache.len(), 0, "stale entry must be deleted by the read");

        let stats = cache.stats();
        assert_eq!(stats.expired, 1);
    }

    #[test]
    fn test_invalidate_is_selective() {
        let cache = test_cache();
        cache.set("comments:post:A:list?page=1", json!(1));
        cache.set("comments:post:A:list?page=2", json!(2));
        cache.set("comments:post:B:list?page=1", json!(3));

        let removed = cache.invalidate(|key| key.contains("post:A"));
        assert_eq!(removed, 2);
        assert!(cache.get("comments:post:A:list?page=1").is_none());
        assert!(cache.get("comments:post:A:list?page=2").is_none());
        assert!(cache.get("comments:post:B:list?page=1").is_some());
    }

    #[test]
    fn test_clear_removes_everything() {
        let cache = test_cache();
        cache.set("a", json!(1));
        cache.set("b", json!(2));
        cache.clear();
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_purge_expired_leaves_fresh_entries() {
        let cache = test_cache();
        cache.set_with_ttl("stale", json!(1), Duration::from_millis(30));
        cache.set("fresh", json!(2));

        sleep(Duration::from_millis(50)).await;
        let purged = cache.purge_expired();

        assert_eq!(purged, 1);
        assert!(cache.get("fresh").is_some());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_stats_track_hits_and_misses() {
        let cache = test_cache();
        cache.set("k", json!(1));
        cache.get("k");
        cache.get("missing");

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn test_capacity_purges_expired_before_insert() {
        tokio_test::block_on(async {
            let cache = TtlCache::new(CacheSettings {
                default_ttl: Duration::from_secs(60),
                max_entries: 2,
                sweep_interval: Duration::from_secs(60),
            });
            cache.set_with_ttl("old", json!(1), Duration::from_millis(30));
            cache.set("kept", json!(2));
            sleep(Duration::from_millis(50)).await;

            cache.set("new", json!(3));
            assert!(cache.get("old").is_none());
            assert!(cache.get("kept").is_some());
            assert!(cache.get("new").is_some());
        });
    }
}
