//! Mock Crossref server setup for integration tests
#![allow(dead_code)]

use crossref_client::cache::{CacheBackend, CacheConfig, MemoryCache};
use crossref_client::notify::InMemoryNotifier;
use crossref_client::{CrossrefClient, Settings};
use mockito::{Mock, Server, ServerGuard};
use std::sync::Arc;
use std::time::Duration;

pub const DOI: &str = "10.1000/xyz 123";
/// `DOI` as it must appear on the wire.
pub const DOI_PATH: &str = "/works/10.1000%2Fxyz%20123";

pub const WORK_BODY: &str = r#"{
  "status": "ok",
  "message-type": "work",
  "message-version": "1.0.0",
  "message": {
    "DOI": "10.1000/xyz 123",
    "type": "journal-article",
    "title": ["Caching Considered Helpful"],
    "author": [{"given": "Grace", "family": "Hopper", "sequence": "first"}],
    "container-title": ["Journal of Examples"],
    "published": {"date-parts": [[2019, 6, 1]]}
  }
}"#;

/// Test fixture that owns a mock server and the notifier handed to clients.
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub notifier: Arc<InMemoryNotifier>,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        Self {
            server: Server::new_async().await,
            notifier: Arc::new(InMemoryNotifier::default()),
        }
    }

    pub fn base_url(&self) -> String {
        self.server.url()
    }

    /// Client against the mock server with a fresh in-memory cache.
    pub fn client(&self, settings: Settings) -> CrossrefClient {
        self.client_with_cache(settings, Arc::new(MemoryCache::new(64)), CacheConfig::default())
    }

    pub fn client_with_cache(
        &self,
        settings: Settings,
        backend: Arc<dyn CacheBackend>,
        config: CacheConfig,
    ) -> CrossrefClient {
        CrossrefClient::builder()
            .settings(settings)
            .base_url_override(self.base_url())
            .cache_backend(backend)
            .cache_config(config)
            .notifier(self.notifier.clone())
            .build()
            .expect("client against mock server")
    }

    pub fn client_with_ttl(&self, ttl: Duration) -> CrossrefClient {
        self.client_with_cache(
            Settings::default(),
            Arc::new(MemoryCache::new(64)),
            CacheConfig::new().with_ttl(ttl),
        )
    }

    /// Successful work lookup, expected `hits` times.
    pub async fn mock_work(&mut self, hits: usize) -> Mock {
        self.server
            .mock("GET", DOI_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_header("x-api-pool", "public")
            .with_body(WORK_BODY)
            .expect(hits)
            .create_async()
            .await
    }

    pub async fn mock_status(&mut self, method: &str, status: usize, hits: usize) -> Mock {
        self.server
            .mock(method, DOI_PATH)
            .with_status(status)
            .with_body(if method == "HEAD" { "" } else { "Resource not available" })
            .expect(hits)
            .create_async()
            .await
    }
}

/// Client pointed at a port nothing listens on.
pub fn unreachable_client(notifier: Arc<InMemoryNotifier>) -> CrossrefClient {
    CrossrefClient::builder()
        .base_url_override("http://127.0.0.1:1")
        .notifier(notifier)
        .build()
        .expect("client with unreachable base url")
}
