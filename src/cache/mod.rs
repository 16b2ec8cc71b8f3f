//! 响应缓存模块：按 “方法:路径” 缓存成功响应，固定有效期，可插拔后端。
//!
//! # Response Caching Module
//!
//! Successful Crossref responses are cached so repeated lookups of the same
//! DOI skip the network.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`CacheManager`] | Typed access with TTL, key prefix and statistics |
//! | [`CacheConfig`] | TTL (one day by default), enable switch, key prefix |
//! | [`CacheBackend`] | Trait for storage backends |
//! | [`MemoryCache`] | In-process LRU cache |
//! | [`FileCache`] | One file per entry in a local directory |
//! | [`NullCache`] | No-op backend that disables caching |
//! | [`CacheKey`] | `METHOD:resolved_path` key |
//!
//! ## Example
//!
//! ```rust
//! use crossref_client::cache::{CacheConfig, CacheManager, MemoryCache};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let backend = Arc::new(MemoryCache::new(1000)); // max 1000 entries
//! let config = CacheConfig::new().with_ttl(Duration::from_secs(3600));
//! let cache = CacheManager::new(config, backend);
//! assert_eq!(cache.backend_name(), "memory");
//! ```
//!
//! ## Key semantics
//!
//! Keys depend only on the HTTP method and the resolved path. The `mailto`
//! query parameter and the API token header do not change what Crossref
//! returns, so they are not part of the key. Failed requests are never stored.

mod backend;
mod key;
mod manager;

pub use backend::{CacheBackend, FileCache, MemoryCache, NullCache};
pub use key::CacheKey;
pub use manager::{CacheConfig, CacheManager, CacheStats, DEFAULT_TTL, MAX_TTL};
