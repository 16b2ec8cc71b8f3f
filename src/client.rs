//! Crossref client.
//!
//! Keep the public surface small: build a [`CrossrefClient`], then call
//! [`CrossrefClient::works_doi`] or [`CrossrefClient::works_doi_exists`].
//! Implementation details are split into submodules under `src/client/`.

pub mod builder;
pub mod core;
mod works;

pub use builder::CrossrefClientBuilder;
pub use self::core::CrossrefClient;
