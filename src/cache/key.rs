//! Cache key derivation.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Cache key: `METHOD:resolved_path`.
///
/// Query parameters and headers (mailto, token) are deliberately not part of
/// the key; they do not change the response content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    key: String,
}

impl CacheKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn for_request(method: &Method, resolved_path: &str) -> Self {
        Self::new(format!("{}:{}", method.as_str(), resolved_path))
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }

    pub fn with_prefix(&self, prefix: &str) -> Self {
        Self::new(format!("{}:{}", prefix, self.key))
    }

    /// SHA-256 hex digest, for stores with restricted key alphabets.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.key.as_bytes());
        hasher
            .finalize()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect()
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key)
    }
}

impl From<&str> for CacheKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CacheKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
