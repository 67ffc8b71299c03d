//! Job record types
//!
//! A [`JobRecord`] is created once per fetched detail page and never mutated
//! afterwards, apart from the `added_at` stamp the storage layer attaches to
//! the copy it reports as committed.

use serde::{Deserialize, Serialize};

/// The five fields extracted from a detail page
///
/// Every field is the empty string when the page lacks the matching node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFields {
    pub title: String,
    pub company: String,
    pub salary: String,
    pub summary: String,
    pub location: String,
}

/// One extracted job posting
///
/// Equality covers every field, including `apply_url`. The pipeline relies on
/// this for its in-memory deduplication: two pages with identical content
/// collapse into one record, while pages differing only in URL are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: String,
    pub company: String,
    pub salary: String,
    pub summary: String,
    pub location: String,
    pub apply_url: String,
    /// Set when the record is committed to the store
    pub added_at: Option<String>,
}

impl JobRecord {
    /// Builds a record from extracted fields and the detail page URL
    pub fn from_fields(fields: JobFields, apply_url: impl Into<String>) -> Self {
        Self {
            title: fields.title,
            company: fields.company,
            salary: fields.salary,
            summary: fields.summary,
            location: fields.location,
            apply_url: apply_url.into(),
            added_at: None,
        }
    }

    /// Returns a copy carrying the given commit timestamp
    pub fn stamped(&self, added_at: &str) -> Self {
        Self {
            added_at: Some(added_at.to_string()),
            ..self.clone()
        }
    }

    /// Returns true if the apply URL is usable for an application
    ///
    /// Only non-empty secure URLs qualify.
    pub fn has_secure_apply_url(&self) -> bool {
        !self.apply_url.is_empty() && self.apply_url.contains("https://")
    }
}
