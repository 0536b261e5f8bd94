use serde::{Deserialize, Serialize};

use crate::models::raw::UNKNOWN;

// ─── Dialect ────────────────────────────────────────────────

/// One of the XML metadata schemas a repository can expose. The dialect
/// tag travels with the configuration; all dialect-specific behavior is
/// selected by it rather than by inspecting identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    OaiDc,
    Dim,
    Didl,
    Xoai,
}

impl Dialect {
    /// The `metadataPrefix` request parameter for this dialect.
    pub fn metadata_prefix(&self) -> &'static str {
        match self {
            Self::OaiDc => "oai_dc",
            Self::Dim => "dim",
            Self::Didl => "didl",
            Self::Xoai => "xoai",
        }
    }
}

// ─── Cluster ────────────────────────────────────────────────

/// Canonical coarse document-type bucket a raw type label resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cluster {
    Thesis,
    Publication,
    Rejected,
}

/// Raw type label together with its resolved cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocType {
    pub raw_label: String,
    pub cluster: Cluster,
}

// ─── Contributors ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Author,
    Advisor,
    Referee,
    Unknown,
    Other(String),
}

impl Role {
    /// Normalize a contributor qualifier. `firstReferee` and
    /// `furtherReferee` are spellings of the same role across dialects.
    pub fn from_qualifier(qualifier: &str) -> Self {
        match qualifier {
            "author" => Self::Author,
            "advisor" => Self::Advisor,
            "referee" | "firstReferee" | "furtherReferee" => Self::Referee,
            UNKNOWN => Self::Unknown,
            other => Self::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    pub name: String,
    pub role: Role,
}

// ─── Subjects & publisher ───────────────────────────────────

/// A subject keyword. A `"ddc"` qualifier implies `value` is a normalized
/// Dewey classification number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub value: String,
    pub qualifier: String,
}

/// Publisher resolution result. For theses `name` is the university and
/// `title` stays empty; for publications the pair is (journal title,
/// publisher name) and either half may be missing on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publisher {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

// ─── NormalizedRecord ───────────────────────────────────────

/// The canonical output unit, one per publication, immutable after
/// extraction except for the language-improvement pass, which may only
/// replace `title` and `abstract_text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub id: String,
    pub doc_type: DocType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,

    /// ISO-ish date string from the `issued` qualifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(default)]
    pub authors: Vec<Contributor>,

    #[serde(default)]
    pub subjects: Vec<Subject>,

    /// Rights URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rights: Option<String>,

    #[serde(default)]
    pub publisher: Publisher,
}
