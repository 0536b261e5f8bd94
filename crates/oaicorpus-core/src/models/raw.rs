use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Sentinel for an absent qualifier or language tag.
///
/// A field with no qualifier is *not* the same as a field whose qualifier
/// was never looked at: later grouping keys on `(qualifier, language)`, so
/// the absence is materialized as `"unknown"` instead of `Option::None`.
pub const UNKNOWN: &str = "unknown";

// ─── RawField ───────────────────────────────────────────────

/// One metadata value as it appeared in the source document, before any
/// selection or normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawField {
    pub element: String,
    pub qualifier: String,
    pub language: String,
    pub text: String,
}

impl RawField {
    pub fn new(
        element: impl Into<String>,
        qualifier: Option<String>,
        language: Option<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            element: element.into(),
            qualifier: qualifier.unwrap_or_else(|| UNKNOWN.to_string()),
            language: language.unwrap_or_else(|| UNKNOWN.to_string()),
            text: text.into(),
        }
    }

    /// True when the language tag explicitly marks English.
    pub fn is_english_tagged(&self) -> bool {
        self.language == "en" || self.language == "eng"
    }

    /// True when the language tag is English or the `"unknown"` sentinel.
    pub fn is_english_or_untagged(&self) -> bool {
        self.is_english_tagged() || self.language == UNKNOWN
    }
}

/// All fields of one record, grouped by element name in document order.
pub type FieldMap = BTreeMap<String, Vec<RawField>>;

// ─── PublicationHeader ──────────────────────────────────────

/// OAI-PMH record header. Identifiers are opaque strings, unique only
/// within one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationHeader {
    pub identifier: String,
    pub is_deleted: bool,
}
