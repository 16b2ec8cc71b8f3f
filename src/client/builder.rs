use crate::cache::{CacheBackend, CacheConfig, CacheManager, MemoryCache};
use crate::client::core::CrossrefClient;
use crate::config::Settings;
use crate::notify::Notifier;
use crate::transport::HttpTransport;
use crate::Result;
use std::sync::Arc;
use std::time::Duration;

/// Builder for creating clients with custom collaborators.
///
/// Defaults: empty settings, an in-memory cache with a one-day TTL, a no-op
/// notifier and the public Crossref API.
pub struct CrossrefClientBuilder {
    settings: Settings,
    cache_backend: Option<Arc<dyn CacheBackend>>,
    cache_config: CacheConfig,
    notifier: Arc<dyn Notifier>,
    /// Override base URL (primarily for testing with mock servers)
    base_url_override: Option<String>,
}

impl CrossrefClientBuilder {
    pub fn new() -> Self {
        Self {
            settings: Settings::default(),
            cache_backend: None,
            cache_config: CacheConfig::default(),
            notifier: crate::notify::noop_notifier(),
            base_url_override: None,
        }
    }

    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Inject a cache backend. Default is a 1000-entry [`MemoryCache`].
    pub fn cache_backend(mut self, backend: Arc<dyn CacheBackend>) -> Self {
        self.cache_backend = Some(backend);
        self
    }

    pub fn cache_config(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_config.ttl = ttl;
        self
    }

    /// Inject a notifier. Default is a no-op notifier.
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Override the API base URL.
    ///
    /// This is primarily for testing with mock servers. `CROSSREF_BASE_URL`
    /// is consulted when no override is given.
    pub fn base_url_override(mut self, base_url: impl Into<String>) -> Self {
        self.base_url_override = Some(base_url.into());
        self
    }

    pub fn build(self) -> Result<CrossrefClient> {
        let base_url = self
            .base_url_override
            .or_else(|| std::env::var("CROSSREF_BASE_URL").ok())
            .filter(|s| !s.trim().is_empty());
        let transport = Arc::new(HttpTransport::new_with_base_url(base_url.as_deref())?);

        let backend = self
            .cache_backend
            .unwrap_or_else(|| Arc::new(MemoryCache::default()));
        let cache = Arc::new(CacheManager::new(self.cache_config, backend));

        tracing::debug!(
            base_url = transport.base_url(),
            cache = cache.backend_name(),
            polite = self.settings.email().is_some(),
            authenticated = self.settings.token().is_some(),
            "crossref client ready"
        );

        Ok(CrossrefClient {
            settings: self.settings,
            transport,
            cache,
            notifier: self.notifier,
        })
    }
}

impl Default for CrossrefClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
