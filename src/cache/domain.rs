//! Per-domain cache namespaces over the shared `TaggedCache`.
//!
//! Every key is stored as `"{domain}:{key}"` and every write carries the domain
//! tag, so `invalidate_all` clears one business area without touching the rest.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use super::entry::CacheOptions;
use super::errors::CacheResult;
use super::tagged::TaggedCache;

/// Namespaced, fail-open view of the shared cache for one domain
#[derive(Debug, Clone)]
pub struct DomainCacheManager {
    domain: String,
    default_ttl: Duration,
    cache: Arc<TaggedCache>,
}

impl DomainCacheManager {
    /// Create a manager using the shared cache's default TTL.
    pub fn new(domain: impl Into<String>, cache: Arc<TaggedCache>) -> Self {
        let default_ttl = cache.default_ttl();
        Self::with_default_ttl(domain, cache, default_ttl)
    }

    pub fn with_default_ttl(
        domain: impl Into<String>,
        cache: Arc<TaggedCache>,
        default_ttl: Duration,
    ) -> Self {
        Self {
            domain: domain.into(),
            default_ttl,
            cache,
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Fully-qualified key as stored in the shared cache
    pub fn cache_key(&self, key: &str) -> String {
        format!("{}:{}", self.domain, key)
    }

    /// Tag for a single entity in this domain, e.g. `challenges:42`
    pub fn entity_tag(&self, id: impl std::fmt::Display) -> String {
        format!("{}:{}", self.domain, id)
    }

    pub async fn get_or_set<T, E, F, Fut>(
        &self,
        key: &str,
        fetch: F,
        options: CacheOptions,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let options = self.scoped_options(options);
        self.cache
            .get_or_set(&self.cache_key(key), fetch, &options)
            .await
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> CacheResult<Option<T>> {
        self.cache.get(&self.cache_key(key))
    }

    pub fn set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        options: CacheOptions,
    ) -> CacheResult<()> {
        let options = self.scoped_options(options);
        self.cache.set(&self.cache_key(key), value, &options)
    }

    /// Delete the single prefixed key.
    pub fn invalidate(&self, key: &str) -> bool {
        self.cache.delete(&self.cache_key(key))
    }

    /// Drop every entry in this domain.
    pub fn invalidate_all(&self) -> usize {
        self.cache.invalidate_by_tag(&self.domain)
    }

    /// Drop every entry carrying `tag`, e.g. an entity tag.
    pub fn invalidate_tag(&self, tag: &str) -> usize {
        self.cache.invalidate_by_tag(tag)
    }

    fn scoped_options(&self, mut options: CacheOptions) -> CacheOptions {
        if options.ttl.is_none() {
            options.ttl = Some(self.default_ttl);
        }
        if !options.tags.iter().any(|tag| tag == &self.domain) {
            options.tags.push(self.domain.clone());
        }
        options
    }
}
