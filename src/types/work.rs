//! Crossref work metadata.
//!
//! Only the commonly used fields are typed; everything else Crossref returns
//! is kept in `extra` so no data is lost.

use serde::{Deserialize, Serialize};

/// Response envelope of `GET /works/{doi}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WorkMessage {
    pub status: String,
    pub message_type: String,
    #[serde(default)]
    pub message_version: Option<String>,
    pub message: Work,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Work {
    #[serde(rename = "DOI")]
    pub doi: String,
    #[serde(rename = "URL", default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub work_type: Option<String>,
    #[serde(default)]
    pub title: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtitle: Vec<String>,
    #[serde(default)]
    pub author: Vec<Contributor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub editor: Vec<Contributor>,
    #[serde(default)]
    pub container_title: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(rename = "ISSN", default, skip_serializing_if = "Vec::is_empty")]
    pub issn: Vec<String>,
    #[serde(rename = "ISBN", default, skip_serializing_if = "Vec::is_empty")]
    pub isbn: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<PartialDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued: Option<PartialDate>,
    #[serde(rename = "abstract", default, skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_referenced_by_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_count: Option<u64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Work {
    /// First title, if any.
    pub fn primary_title(&self) -> Option<&str> {
        self.title.first().map(String::as_str)
    }

    /// First container (journal, book, proceedings) title, if any.
    pub fn container(&self) -> Option<&str> {
        self.container_title.first().map(String::as_str)
    }

    /// Publication year: `published`, falling back to `issued`.
    pub fn year(&self) -> Option<i32> {
        self.published
            .as_ref()
            .and_then(PartialDate::year)
            .or_else(|| self.issued.as_ref().and_then(PartialDate::year))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contributor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    /// Organizational authors carry only a name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<String>,
    #[serde(rename = "ORCID", default, skip_serializing_if = "Option::is_none")]
    pub orcid: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub affiliation: Vec<Affiliation>,
}

impl Contributor {
    /// "Given Family", the family name alone, or the organization name.
    pub fn display_name(&self) -> Option<String> {
        let given = self.given.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let family = self.family.as_deref().map(str::trim).filter(|s| !s.is_empty());
        match (given, family) {
            (Some(g), Some(f)) => Some(format!("{} {}", g, f)),
            (None, Some(f)) => Some(f.to_string()),
            (Some(g), None) => Some(g.to_string()),
            (None, None) => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Affiliation {
    pub name: String,
}

/// Crossref date: `{"date-parts": [[year, month?, day?]]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PartialDate {
    #[serde(default)]
    pub date_parts: Vec<Vec<Option<i32>>>,
}

impl PartialDate {
    pub fn year(&self) -> Option<i32> {
        self.date_parts.first()?.first().copied().flatten()
    }

    pub fn month(&self) -> Option<u32> {
        let m = self.date_parts.first()?.get(1).copied().flatten()?;
        u32::try_from(m).ok()
    }

    pub fn day(&self) -> Option<u32> {
        let d = self.date_parts.first()?.get(2).copied().flatten()?;
        u32::try_from(d).ok()
    }
}
