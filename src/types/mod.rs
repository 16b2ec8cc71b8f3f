//! Typed Crossref payloads.

pub mod work;

pub use work::{Affiliation, Contributor, PartialDate, Work, WorkMessage};
