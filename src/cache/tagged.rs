//! # Tagged Cache
//!
//! In-memory key/value store with per-entry TTL and tag-based group invalidation.
//!
//! The entry map and the tag index live behind one `parking_lot::RwLock`, so every
//! mutation (set, delete, tag invalidation, lazy expiry) is a single critical
//! section. Readers of a tag never observe a half-invalidated group. Locks are
//! never held across an `.await`.
//!
//! `get_or_set` is fail-open: any `CacheError` on the read or write side is logged
//! and the caller's fetch function runs directly. Concurrent misses on the same
//! key are coalesced so only one fetch is in flight per key.

use dashmap::DashMap;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tokio::time::Instant;
use tracing::{debug, warn};

use super::entry::{CacheEntry, CacheOptions};
use super::errors::{CacheError, CacheResult};
use crate::config::CacheConfig;

/// Coarse cache status for observability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheStatus {
    Active,
    Disabled,
}

/// Point-in-time cache statistics. No semantic guarantees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub size: usize,
    pub tags: usize,
    pub max_entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub status: CacheStatus,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Entry map plus the derived tag index
#[derive(Debug, Default)]
struct StoreState {
    entries: HashMap<String, CacheEntry>,
    tag_index: HashMap<String, HashSet<String>>,
}

impl StoreState {
    /// Replace any previous entry for `key`, re-indexing its tags from scratch.
    fn insert(&mut self, key: String, entry: CacheEntry) {
        self.remove_entry(&key);
        for tag in &entry.tags {
            self.tag_index
                .entry(tag.clone())
                .or_default()
                .insert(key.clone());
        }
        self.entries.insert(key, entry);
    }

    /// Remove an entry together with all of its tag associations.
    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry> {
        let entry = self.entries.remove(key)?;
        for tag in &entry.tags {
            if let Some(keys) = self.tag_index.get_mut(tag) {
                keys.remove(key);
                if keys.is_empty() {
                    self.tag_index.remove(tag);
                }
            }
        }
        Some(entry)
    }

    fn invalidate_tag(&mut self, tag: &str) -> usize {
        let Some(keys) = self.tag_index.remove(tag) else {
            return 0;
        };
        keys.iter()
            .filter(|key| self.remove_entry(key).is_some())
            .count()
    }

    fn purge_expired(&mut self, now: Instant) -> usize {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            self.remove_entry(key);
        }
        expired.len()
    }
}

/// Process-wide tagged cache.
///
/// Constructed once by the composition root and shared via `Arc`.
#[derive(Debug)]
pub struct TaggedCache {
    state: RwLock<StoreState>,
    enabled: bool,
    max_entries: usize,
    default_ttl: Duration,
    in_flight: DashMap<String, Arc<AsyncMutex<()>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Default for TaggedCache {
    fn default() -> Self {
        Self::from_config(&CacheConfig::default())
    }
}

impl TaggedCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        debug!(
            enabled = config.enabled,
            max_entries = config.max_entries,
            default_ttl_seconds = config.default_ttl_seconds,
            "Tagged cache initialized"
        );

        Self {
            state: RwLock::new(StoreState::default()),
            enabled: config.enabled,
            max_entries: config.max_entries,
            default_ttl: config.default_ttl(),
            in_flight: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Get a live value, treating expired entries as misses and removing them.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> CacheResult<Option<T>> {
        let value = self.lookup(key);
        let counter = if value.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        Self::decode(key, value)
    }

    /// Same as `get` without touching the hit/miss counters.
    fn peek<T: DeserializeOwned>(&self, key: &str) -> CacheResult<Option<T>> {
        Self::decode(key, self.lookup(key))
    }

    fn decode<T: DeserializeOwned>(
        key: &str,
        value: Option<serde_json::Value>,
    ) -> CacheResult<Option<T>> {
        match value {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| CacheError::serialization(key, e)),
            None => Ok(None),
        }
    }

    fn lookup(&self, key: &str) -> Option<serde_json::Value> {
        if !self.enabled {
            return None;
        }

        {
            let state = self.state.read();
            match state.entries.get(key) {
                None => return None,
                Some(entry) if !entry.is_expired() => return Some(entry.value.clone()),
                Some(_) => {}
            }
        }

        // Expired: re-check under the write lock since a writer may have replaced it.
        let mut state = self.state.write();
        if state.entries.get(key).is_some_and(CacheEntry::is_expired) {
            state.remove_entry(key);
            debug!(key = %key, "Expired cache entry removed on read");
        }
        None
    }

    /// Store a value with absolute expiry `now + ttl`, replacing any previous entry.
    pub fn set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        options: &CacheOptions,
    ) -> CacheResult<()> {
        if !self.enabled {
            return Ok(());
        }

        let value = serde_json::to_value(value).map_err(|e| CacheError::serialization(key, e))?;
        let ttl = options.ttl.unwrap_or(self.default_ttl);
        let entry = CacheEntry::new(value, ttl, options.tag_set());

        let mut state = self.state.write();
        if !state.entries.contains_key(key) && state.entries.len() >= self.max_entries {
            let purged = state.purge_expired(Instant::now());
            debug!(purged, "Purged expired entries to make room");
            if state.entries.len() >= self.max_entries {
                return Err(CacheError::CapacityExceeded {
                    max_entries: self.max_entries,
                });
            }
        }
        state.insert(key.to_string(), entry);
        Ok(())
    }

    /// Remove an entry and its tag associations. Returns whether it existed.
    pub fn delete(&self, key: &str) -> bool {
        self.state.write().remove_entry(key).is_some()
    }

    /// Remove every entry indexed under `tag`, and the tag itself.
    pub fn invalidate_by_tag(&self, tag: &str) -> usize {
        let removed = self.state.write().invalidate_tag(tag);
        debug!(tag = %tag, removed, "Cache tag invalidated");
        removed
    }

    /// Sweep all expired entries. Only needed to bound memory.
    pub fn purge_expired(&self) -> usize {
        self.state.write().purge_expired(Instant::now())
    }

    pub fn clear(&self) {
        let mut state = self.state.write();
        state.entries.clear();
        state.tag_index.clear();
    }

    /// Keys currently indexed under `tag`, including not-yet-purged expired ones.
    pub fn keys_for_tag(&self, tag: &str) -> Vec<String> {
        self.state
            .read()
            .tag_index
            .get(tag)
            .map(|keys| keys.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get_stats(&self) -> CacheStats {
        let state = self.state.read();
        CacheStats {
            size: state.entries.len(),
            tags: state.tag_index.len(),
            max_entries: self.max_entries,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            status: if self.enabled {
                CacheStatus::Active
            } else {
                CacheStatus::Disabled
            },
        }
    }

    /// Return the cached value, or run `fetch`, cache its result and return it.
    ///
    /// Errors from `fetch` propagate untouched and nothing is cached. Cache
    /// failures never propagate: the value from `fetch` is returned regardless.
    pub async fn get_or_set<T, E, F, Fut>(
        &self,
        key: &str,
        fetch: F,
        options: &CacheOptions,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        match self.get::<T>(key) {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => {}
            Err(error) => {
                warn!(key = %key, error = %error, "Cache read failed, fetching directly");
                return fetch().await;
            }
        }

        if !self.enabled {
            return fetch().await;
        }

        let _permit = self.acquire_flight(key).await;

        // Another caller may have filled the key while we waited.
        match self.peek::<T>(key) {
            Ok(Some(value)) => Ok(value),
            Ok(None) => {
                let value = fetch().await?;
                if let Err(error) = self.set(key, &value, options) {
                    warn!(key = %key, error = %error, "Cache write failed, returning fetched value");
                }
                Ok(value)
            }
            Err(error) => {
                warn!(key = %key, error = %error, "Cache read failed, fetching directly");
                fetch().await
            }
        }
    }

    async fn acquire_flight(&self, key: &str) -> FlightPermit<'_> {
        let lock = self
            .in_flight
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone();
        let guard = lock.lock_owned().await;
        FlightPermit {
            cache: self,
            key: key.to_string(),
            _guard: guard,
        }
    }
}

/// Holds the per-key fetch lock; releases the map slot when the last holder leaves.
struct FlightPermit<'a> {
    cache: &'a TaggedCache,
    key: String,
    _guard: OwnedMutexGuard<()>,
}

impl Drop for FlightPermit<'_> {
    fn drop(&mut self) {
        // The map and our guard each hold one reference; anything above that is a waiter.
        self.cache
            .in_flight
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) <= 2);
    }
}
