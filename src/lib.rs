//! # crossref-client
//!
//! 这是 Crossref 元数据 API 的异步客户端：按 DOI 查询作品、检查 DOI 是否存在，并缓存响应。
//!
//! Async client for the Crossref metadata API (`https://api.crossref.org`).
//!
//! ## Overview
//!
//! Two operations are modeled: looking up a work by DOI and checking whether a
//! DOI exists. Every request goes through one pipeline:
//!
//! - **Request building**: path templates with percent-encoded parameters,
//!   `mailto` for the polite pool, `Crossref-Plus-API-Token` for Plus users,
//!   and a transfer-statistics hook in debug mode
//! - **Caching**: successful responses are cached for a day under
//!   `METHOD:resolved_path`, with pluggable backends
//! - **Error classification**: connect failures, server errors, not-found and
//!   other client errors are told apart; users are notified, callers get the error
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use crossref_client::{CrossrefClient, Settings};
//!
//! #[tokio::main]
//! async fn main() -> crossref_client::Result<()> {
//!     let settings = Settings::new().with_email("librarian@example.org");
//!     let client = CrossrefClient::new(settings)?;
//!
//!     if client.works_doi_exists("10.1000/xyz123").await? {
//!         let work = client.works_doi("10.1000/xyz123").await?;
//!         println!("{:?}", work.message.primary_title());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Client, builder and the `/works` operations |
//! | [`request`] | Path templates, request options, transfer stats |
//! | [`cache`] | Response caching with multiple backends |
//! | [`transport`] | HTTP execution and failure classification |
//! | [`config`] | Settings (email, token, debug) |
//! | [`notify`] | User-facing warning and error notifications |
//! | [`types`] | Typed work metadata |

pub mod cache;
pub mod client;
pub mod config;
pub mod error_code;
pub mod notify;
pub mod request;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use client::{CrossrefClient, CrossrefClientBuilder};
pub use config::Settings;
pub use error_code::FailureClass;
pub use notify::{Notice, Notifier};
pub use request::RequestOptions;
pub use transport::Response;
pub use types::{Work, WorkMessage};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
