use super::{Response, TransportError};
use crate::error_code::FailureClass;
use crate::request::{RequestOptions, TransferStats, API_POOL_HEADER};
use crate::{Error, ErrorContext, Result};
use reqwest::{Method, Proxy};
use std::collections::BTreeMap;
use std::env;
use std::time::{Duration, Instant};

pub const DEFAULT_BASE_URL: &str = "https://api.crossref.org";

/// Longest body excerpt carried in an error message.
const ERROR_BODY_EXCERPT: usize = 200;

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        Self::new_with_base_url(None)
    }

    /// Build a transport against `base_url_override`, or the public API.
    ///
    /// No request timeout is configured; the connection pool is env-tunable.
    pub fn new_with_base_url(base_url_override: Option<&str>) -> Result<Self> {
        let base_url = base_url_override.unwrap_or(DEFAULT_BASE_URL);
        let parsed = url::Url::parse(base_url).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid base url: {}", e),
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_details(base_url)
                    .with_source("http_transport"),
            )
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::configuration_with_context(
                "base url must use http or https",
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_details(base_url)
                    .with_source("http_transport"),
            ));
        }

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("crossref-client/", env!("CARGO_PKG_VERSION")))
            .pool_max_idle_per_host(
                env::var("CROSSREF_HTTP_POOL_MAX_IDLE_PER_HOST")
                    .ok()
                    .and_then(|s| s.parse::<usize>().ok())
                    .unwrap_or(8),
            )
            .pool_idle_timeout(Some(Duration::from_secs(
                env::var("CROSSREF_HTTP_POOL_IDLE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(90),
            )));

        if let Ok(proxy_url) = env::var("CROSSREF_PROXY_URL") {
            if let Ok(proxy) = Proxy::all(&proxy_url) {
                builder = builder.proxy(proxy);
            }
        }

        let client = builder
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URI for a resolved path (no query string).
    pub fn uri(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send one request and classify the outcome.
    ///
    /// Only 2xx is success. Other statuses come back as `Error::NotFound`,
    /// `Error::Client`, `Error::Server` or `Error::UnexpectedStatus`. A request
    /// that never got a complete response is `Error::Connect`.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        options: &RequestOptions,
    ) -> Result<Response> {
        let uri = self.uri(path);
        let mut request = self.client.request(method.clone(), &uri);

        if !options.query.is_empty() {
            request = request.query(&options.query);
        }
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let started = Instant::now();
        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                if let Some(on_stats) = &options.on_stats {
                    on_stats(&TransferStats {
                        method,
                        uri: uri.clone(),
                        transfer_time: started.elapsed(),
                        status: None,
                        reason: None,
                        api_pool: None,
                    });
                }
                return Err(Error::Connect { uri, source: e });
            }
        };

        let status = response.status();
        let effective_uri = response.url().to_string();
        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Connect {
                uri: uri.clone(),
                source: e,
            })?
            .to_vec();

        if let Some(on_stats) = &options.on_stats {
            on_stats(&TransferStats {
                method,
                uri: effective_uri,
                transfer_time: started.elapsed(),
                status: Some(status.as_u16()),
                reason: status.canonical_reason().map(str::to_string),
                api_pool: headers.get(API_POOL_HEADER).cloned(),
            });
        }

        let response = Response {
            status: status.as_u16(),
            headers,
            body,
        };
        match FailureClass::from_http_status(response.status) {
            None => Ok(response),
            Some(class) => Err(failure_from_response(class, uri, &response, status.canonical_reason())),
        }
    }
}

fn failure_from_response(
    class: FailureClass,
    uri: String,
    response: &Response,
    reason: Option<&str>,
) -> Error {
    let message = error_message(response, reason);
    match class {
        FailureClass::NotFound => Error::NotFound { uri },
        FailureClass::ServerFailure => Error::Server {
            status: response.status,
            uri,
            message,
        },
        FailureClass::OtherClientFailure => Error::Client {
            status: response.status,
            uri,
            message,
        },
        // Connect failures never carry a status.
        FailureClass::UnexpectedStatus | FailureClass::ConnectFailure => Error::UnexpectedStatus {
            status: response.status,
            uri,
            message,
        },
    }
}

/// Reason phrase plus a short excerpt of the body, if any.
fn error_message(response: &Response, reason: Option<&str>) -> String {
    let reason = reason.unwrap_or("Unknown status");
    let text = response.text();
    let excerpt = text.trim();
    if excerpt.is_empty() {
        return reason.to_string();
    }
    let excerpt: String = excerpt.chars().take(ERROR_BODY_EXCERPT).collect();
    format!("{}: {}", reason, excerpt)
}
