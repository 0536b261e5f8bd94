//! Post-hoc language-improvement pass over an already-built corpus.
//!
//! Re-evaluates titles and abstracts with the statistical detector and
//! overwrites a field only when a strictly better same-field candidate
//! exists. Every overwrite is recorded, both in memory and in an
//! append-only audit file, so corrections stay reviewable.

use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use oaicorpus_core::{FieldMap, NormalizedRecord};

use crate::error::Result;
use crate::extract::abstract_candidates;
use crate::language::{EnglishCheck, LanguageDetector};
use crate::select::select_longest_english;

const PREVIEW_LEN: usize = 10;

/// One applied correction, with truncated previews for the log.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Correction {
    pub field: &'static str,
    pub id: String,
    pub old_preview: String,
    pub new_preview: String,
}

fn preview(value: Option<&str>) -> String {
    let value = value.unwrap_or("");
    let mut out: String = value.chars().take(PREVIEW_LEN).collect();
    if value.chars().count() > PREVIEW_LEN {
        out.push('…');
    }
    out
}

/// Better title/abstract candidates, keyed by record identifier. A
/// missing key or a `None` value both mean "no improvement available",
/// never "clear the field".
#[derive(Debug, Default)]
pub struct BetterCandidates {
    pub titles: BTreeMap<String, Option<String>>,
    pub abstracts: BTreeMap<String, Option<String>>,
}

impl BetterCandidates {
    /// Recomputes candidates from the raw fields of each record, using
    /// the longest-English policy on titles and abstract-shaped fields
    /// alike. Records without raw fields get no entry.
    pub fn compute(
        raw_fields: &BTreeMap<String, FieldMap>,
        check: &EnglishCheck,
        detector: &dyn LanguageDetector,
    ) -> Self {
        let mut better = Self::default();
        for (id, fields) in raw_fields {
            let titles: Vec<_> = fields
                .get("title")
                .into_iter()
                .flatten()
                .filter(|t| t.qualifier != "subtitle")
                .cloned()
                .collect();
            better.titles.insert(
                id.clone(),
                select_longest_english(&titles, check, detector).map(str::to_string),
            );
            let abstracts: Vec<_> = abstract_candidates(fields).cloned().collect();
            better.abstracts.insert(
                id.clone(),
                select_longest_english(&abstracts, check, detector).map(str::to_string),
            );
        }
        better
    }
}

/// Applies the better candidates in place. Only `title` and
/// `abstract_text` ever change; running the pass twice with the same
/// candidates is a no-op the second time.
pub fn improve(
    corpus: &mut BTreeMap<String, NormalizedRecord>,
    better: &BetterCandidates,
) -> Vec<Correction> {
    let mut corrections = Vec::new();
    for (id, record) in corpus.iter_mut() {
        apply(
            "title",
            id,
            &mut record.title,
            better.titles.get(id),
            &mut corrections,
        );
        apply(
            "abstract",
            id,
            &mut record.abstract_text,
            better.abstracts.get(id),
            &mut corrections,
        );
    }
    corrections
}

fn apply(
    field: &'static str,
    id: &str,
    current: &mut Option<String>,
    candidate: Option<&Option<String>>,
    corrections: &mut Vec<Correction>,
) {
    let Some(Some(candidate)) = candidate else {
        return;
    };
    if current.as_deref() == Some(candidate.as_str()) {
        return;
    }
    corrections.push(Correction {
        field,
        id: id.to_string(),
        old_preview: preview(current.as_deref()),
        new_preview: preview(Some(candidate)),
    });
    *current = Some(candidate.clone());
}

/// Appends one timestamped line per correction to `path`.
pub fn append_audit_log(path: &Path, corrections: &[Correction]) -> Result<()> {
    if corrections.is_empty() {
        return Ok(());
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let stamp = chrono::Utc::now().to_rfc3339();
    for c in corrections {
        writeln!(
            file,
            "{stamp}\t{}\t{}\t{:?} -> {:?}",
            c.field, c.id, c.old_preview, c.new_preview
        )?;
    }
    tracing::info!(count = corrections.len(), path = %path.display(), "audit log appended");
    Ok(())
}
