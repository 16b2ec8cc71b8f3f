//! Request building: endpoint templates, per-request options and transfer stats.
//!
//! Path parameters are always percent-encoded here. DOIs routinely contain
//! `/`, spaces, `<`, `;` and other reserved characters, so callers pass raw
//! values and never pre-encode.

use crate::config::Settings;
use reqwest::Method;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Work lookup endpoint, relative to the API base URL.
pub const WORKS_DOI: &str = "/works/{doi}";

pub const MAILTO_PARAM: &str = "mailto";
pub const TOKEN_HEADER: &str = "Crossref-Plus-API-Token";
/// Response header naming the pool (public, polite, plus) that served the request.
pub const API_POOL_HEADER: &str = "x-api-pool";

/// Substitute `params` into `template`.
///
/// Each key is replaced literally (no pattern matching) by the percent-encoded
/// value wherever it occurs. Keys include their delimiters, e.g. `{doi}`.
pub fn resolve_path(template: &str, params: &[(&str, &str)]) -> String {
    let mut path = template.to_string();
    for (key, value) in params {
        if key.is_empty() {
            continue;
        }
        path = path.replace(key, &urlencoding::encode(value));
    }
    path
}

/// Statistics for one HTTP transfer, handed to the `on_stats` callback.
#[derive(Debug, Clone)]
pub struct TransferStats {
    pub method: Method,
    pub uri: String,
    pub transfer_time: Duration,
    /// `None` when no response was received.
    pub status: Option<u16>,
    pub reason: Option<String>,
    pub api_pool: Option<String>,
}

pub type StatsCallback = Arc<dyn Fn(&TransferStats) + Send + Sync>;

/// Debug-mode stats callback: one `tracing` debug event per transfer.
pub fn log_transfer_stats(stats: &TransferStats) {
    tracing::debug!(
        uri = %stats.uri,
        method = %stats.method,
        transfer_time_ms = stats.transfer_time.as_millis() as u64,
        status = ?stats.status,
        reason = stats.reason.as_deref().unwrap_or(""),
        api_pool = stats.api_pool.as_deref().unwrap_or("-"),
        "crossref transfer"
    );
}

/// Query parameters, headers and hooks for one request.
#[derive(Clone, Default)]
pub struct RequestOptions {
    pub query: BTreeMap<String, String>,
    pub headers: BTreeMap<String, String>,
    pub on_stats: Option<StatsCallback>,
}

impl fmt::Debug for RequestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestOptions")
            .field("query", &self.query)
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .field("on_stats", &self.on_stats.is_some())
            .finish()
    }
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options every request carries for the given settings.
    ///
    /// - email -> `mailto` query parameter
    /// - token -> `Crossref-Plus-API-Token: Bearer <token>`
    /// - debug -> [`log_transfer_stats`] as the stats callback
    pub fn from_settings(settings: &Settings) -> Self {
        let mut options = Self::new();
        if let Some(email) = settings.email() {
            options
                .query
                .insert(MAILTO_PARAM.to_string(), email.to_string());
        }
        if let Some(token) = settings.token() {
            options
                .headers
                .insert(TOKEN_HEADER.to_string(), format!("Bearer {}", token));
        }
        if settings.debug {
            options.on_stats = Some(Arc::new(log_transfer_stats));
        }
        options
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn with_on_stats(mut self, callback: StatsCallback) -> Self {
        self.on_stats = Some(callback);
        self
    }

    /// Lay `extra` over `self`. On conflicting keys `extra` wins; keys only
    /// present in `self` are kept. A callback in `extra` replaces ours.
    pub fn overlay(mut self, extra: RequestOptions) -> Self {
        self.query.extend(extra.query);
        for (name, value) in extra.headers {
            // Header names are case-insensitive.
            self.headers.retain(|k, _| !k.eq_ignore_ascii_case(&name));
            self.headers.insert(name, value);
        }
        if extra.on_stats.is_some() {
            self.on_stats = extra.on_stats;
        }
        self
    }
}
