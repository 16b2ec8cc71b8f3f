//! Client settings.
//!
//! Three values drive the request pipeline: a contact email for the polite
//! pool, a Crossref Plus API token and a debug flag. They are read-only once
//! the client is built.

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

pub const ENV_EMAIL: &str = "CROSSREF_EMAIL";
pub const ENV_TOKEN: &str = "CROSSREF_TOKEN";
pub const ENV_DEBUG: &str = "CROSSREF_DEBUG";

/// Settings supplied by the embedding application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Contact email sent as `mailto` to get polite-pool service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Crossref Plus API token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Emit transfer statistics for every request.
    pub debug: bool,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Configured email; blank values count as absent.
    pub fn email(&self) -> Option<&str> {
        non_blank(self.email.as_deref())
    }

    /// Configured token; blank values count as absent.
    pub fn token(&self) -> Option<&str> {
        non_blank(self.token.as_deref())
    }

    /// Load settings from `CROSSREF_EMAIL`, `CROSSREF_TOKEN` and `CROSSREF_DEBUG`.
    ///
    /// Unset variables fall back to the defaults. `CROSSREF_DEBUG` accepts
    /// `1`, `true`, `yes` and `on` (case-insensitive).
    pub fn from_env() -> Self {
        Self {
            email: env::var(ENV_EMAIL).ok().filter(|s| !s.trim().is_empty()),
            token: env::var(ENV_TOKEN).ok().filter(|s| !s.trim().is_empty()),
            debug: env::var(ENV_DEBUG)
                .ok()
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
        }
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load settings from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration_with_context(
                format!("cannot read settings file: {}", e),
                ErrorContext::new()
                    .with_field_path(path.display().to_string())
                    .with_source("settings_loader"),
            )
        })?;
        Self::from_yaml_str(&content)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
