//! `/works` endpoints.

use super::core::CrossrefClient;
use crate::request::WORKS_DOI;
use crate::types::WorkMessage;
use crate::{Error, Result};
use reqwest::Method;

impl CrossrefClient {
    /// Look up a work by DOI.
    ///
    /// The DOI is passed raw; it is percent-encoded into the path. On 404 the
    /// notifier gets one "not found" warning and `Error::NotFound` is returned.
    pub async fn works_doi(&self, doi: &str) -> Result<WorkMessage> {
        match self
            .request(Method::GET, WORKS_DOI, &[("{doi}", doi)], None)
            .await
        {
            Ok(response) => response.json(),
            Err(e) if e.is_not_found() => {
                self.notifier.warning(&not_found_message(doi));
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Whether Crossref knows `doi`, via a HEAD request.
    ///
    /// A 404 is an answer here, not a failure: it yields `Ok(false)` and no
    /// notification. Every other non-2xx status is returned as an error.
    pub async fn works_doi_exists(&self, doi: &str) -> Result<bool> {
        match self
            .request(Method::HEAD, WORKS_DOI, &[("{doi}", doi)], None)
            .await
        {
            // The transport only returns 2xx responses.
            Ok(_) => Ok(true),
            Err(Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

fn not_found_message(doi: &str) -> String {
    format!("DOI not found in Crossref: {}", doi)
}
