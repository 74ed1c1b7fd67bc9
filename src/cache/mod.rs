//! # Cache Module
//!
//! In-process caching for read-heavy data access.
//!
//! ## Architecture
//!
//! ```text
//! DomainCacheManager ("users")      <- "{domain}:{key}" keys, domain tag, domain TTL
//! DomainCacheManager ("challenges")
//!          │
//!          ▼
//! TaggedCache                        <- TTL entries + tag index behind one RwLock
//! ```
//!
//! ## Design Decisions
//!
//! - **Lazy expiry**: expired entries are dropped when read; `purge_expired` bounds memory
//! - **Fail-open**: `get_or_set` never surfaces a cache fault, it fetches directly
//! - **Single-flight**: concurrent misses for one key run a single fetch
//! - **Disable switch**: a disabled cache always misses and accepts every write

pub mod domain;
pub mod entry;
pub mod errors;
pub mod tagged;

pub use domain::DomainCacheManager;
pub use entry::{CacheEntry, CacheOptions};
pub use errors::{CacheError, CacheResult};
pub use tagged::{CacheStats, CacheStatus, TaggedCache};
