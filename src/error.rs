use crate::error_code::FailureClass;
use thiserror::Error;

/// Structured error context for configuration and cache failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Settings key or path that caused the error (e.g., "settings.base_url", "cache.dir")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., the rejected value)
    pub details: Option<String>,
    /// Source of the error (e.g., "settings_loader", "file_cache")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for the Crossref client.
///
/// The first five variants are the request failure taxonomy; everything else is
/// local (configuration, cache, decoding).
#[derive(Debug, Error)]
pub enum Error {
    #[error("Could not connect to {uri}: {source}")]
    Connect {
        uri: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Server error: HTTP {status} from {uri}: {message}")]
    Server {
        status: u16,
        uri: String,
        message: String,
    },

    #[error("Not found: {uri}")]
    NotFound { uri: String },

    #[error("Client error: HTTP {status} from {uri}: {message}")]
    Client {
        status: u16,
        uri: String,
        message: String,
    },

    #[error("Unexpected status: HTTP {status} from {uri}: {message}")]
    UnexpectedStatus {
        status: u16,
        uri: String,
        message: String,
    },

    #[error("Network transport error: {0}")]
    Transport(#[from] crate::transport::TransportError),

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Cache error: {message}{}", format_context(.context))]
    Cache {
        message: String,
        context: ErrorContext,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Settings file error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Create a new cache error with structured context
    pub fn cache_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Cache {
            message: msg.into(),
            context,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } | Error::Cache { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Request failure class, for errors produced by an HTTP exchange.
    pub fn failure_class(&self) -> Option<FailureClass> {
        match self {
            Error::Connect { .. } => Some(FailureClass::ConnectFailure),
            Error::Server { .. } => Some(FailureClass::ServerFailure),
            Error::NotFound { .. } => Some(FailureClass::NotFound),
            Error::Client { .. } => Some(FailureClass::OtherClientFailure),
            Error::UnexpectedStatus { .. } => Some(FailureClass::UnexpectedStatus),
            _ => None,
        }
    }

    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Server { status, .. }
            | Error::Client { status, .. }
            | Error::UnexpectedStatus { status, .. } => Some(*status),
            Error::NotFound { .. } => Some(404),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}
