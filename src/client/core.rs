use crate::cache::{CacheKey, CacheManager};
use crate::config::Settings;
use crate::notify::{Notifier, TRY_AGAIN_LATER};
use crate::request::{resolve_path, RequestOptions};
use crate::transport::{HttpTransport, Response};
use crate::{Error, Result};
use reqwest::Method;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Crossref API client.
///
/// Cheap to share behind an `Arc`; all state is immutable apart from the
/// cache backend.
pub struct CrossrefClient {
    pub(crate) settings: Settings,
    pub(crate) transport: Arc<HttpTransport>,
    pub(crate) cache: Arc<CacheManager>,
    pub(crate) notifier: Arc<dyn Notifier>,
}

impl CrossrefClient {
    /// Client for the public API with the given settings and default collaborators.
    pub fn new(settings: Settings) -> Result<Self> {
        Self::builder().settings(settings).build()
    }

    pub fn builder() -> crate::client::builder::CrossrefClientBuilder {
        crate::client::builder::CrossrefClientBuilder::new()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn cache(&self) -> &CacheManager {
        &self.cache
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// Options derived from settings, before any per-call overlay.
    pub fn request_options(&self) -> RequestOptions {
        RequestOptions::from_settings(&self.settings)
    }

    /// Run one request through the pipeline.
    ///
    /// 1. resolve `template` with percent-encoded `params`
    /// 2. return a fresh cached response for `METHOD:path` without touching the network
    /// 3. otherwise send with settings-derived options, `extra` laid over them
    /// 4. store 2xx responses for the cache TTL
    ///
    /// Connect failures and 5xx responses are logged and reported to the
    /// notifier before being returned. Other failures are returned as-is.
    pub async fn request(
        &self,
        method: Method,
        template: &str,
        params: &[(&str, &str)],
        extra: Option<RequestOptions>,
    ) -> Result<Response> {
        let path = resolve_path(template, params);
        let key = CacheKey::for_request(&method, &path);

        match self.cache.get::<Response>(&key).await {
            Ok(Some(cached)) => {
                debug!(key = %key, "crossref cache hit");
                return Ok(cached);
            }
            Ok(None) => {}
            Err(e) => warn!(key = %key, error = %e, "crossref cache read failed, fetching"),
        }

        let mut options = self.request_options();
        if let Some(extra) = extra {
            options = options.overlay(extra);
        }

        let response = match self.transport.execute(method, &path, &options).await {
            Ok(r) => r,
            Err(e) => {
                self.report_failure(&e);
                return Err(e);
            }
        };

        if response.is_success() {
            if let Err(e) = self.cache.set(&key, &response).await {
                warn!(key = %key, error = %e, "crossref cache write failed");
            }
        }
        Ok(response)
    }

    fn report_failure(&self, err: &Error) {
        match err {
            Error::Connect { uri, source } => {
                error!(uri = %uri, error = %source, "Could not connect to Crossref");
                self.notifier.error(TRY_AGAIN_LATER);
            }
            Error::Server {
                status,
                uri,
                message,
            } => {
                error!(status = *status, uri = %uri, message = %message, "Crossref server error");
                self.notifier.error(TRY_AGAIN_LATER);
            }
            _ => {}
        }
    }
}
