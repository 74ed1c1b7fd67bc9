//! Cache entries and per-write options.

use std::collections::HashSet;
use std::time::Duration;
use tokio::time::Instant;

/// A single cached value with its absolute expiry and tag set.
///
/// Owned exclusively by the store that created it.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: serde_json::Value,
    pub expires_at: Instant,
    pub tags: HashSet<String>,
}

impl CacheEntry {
    pub fn new(value: serde_json::Value, ttl: Duration, tags: HashSet<String>) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
            tags,
        }
    }

    /// An entry is live strictly before its expiry instant.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Time left before expiry, zero once expired.
    pub fn remaining_ttl(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}

/// TTL and tags applied to a cache write.
///
/// A missing TTL means "use the cache default" (or the domain default when
/// written through a `DomainCacheManager`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheOptions {
    pub ttl: Option<Duration>,
    pub tags: Vec<String>,
}

impl CacheOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the time-to-live for the write.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Add a single tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Add several tags at once.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Deduplicated tag set for storage.
    pub(crate) fn tag_set(&self) -> HashSet<String> {
        self.tags.iter().cloned().collect()
    }
}
