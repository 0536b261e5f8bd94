//! Per-field inspection dumps of a built corpus.
//!
//! These are simple serialized mappings meant for eyeballing the data,
//! not for downstream consumption. All of them iterate the corpus in
//! identifier order, so repeated dumps of the same corpus are
//! byte-identical.

use std::collections::BTreeMap;

use oaicorpus_core::{Contributor, NormalizedRecord, Role};

use crate::language::{EnglishCheck, LanguageDetector};

/// All distinct contributor names with the record ids they appear on.
pub fn authors_by_name(
    corpus: &BTreeMap<String, NormalizedRecord>,
) -> BTreeMap<String, Vec<String>> {
    let mut by_name: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (id, record) in corpus {
        for author in real_contributors(record) {
            by_name.entry(author.name.clone()).or_default().push(id.clone());
        }
    }
    by_name
}

/// Contributor names per record.
pub fn authors_by_record(
    corpus: &BTreeMap<String, NormalizedRecord>,
) -> BTreeMap<String, Vec<String>> {
    corpus
        .iter()
        .map(|(id, record)| {
            let names = real_contributors(record)
                .map(|a| a.name.clone())
                .collect();
            (id.clone(), names)
        })
        .collect()
}

/// Subject values per record.
pub fn subjects_by_record(
    corpus: &BTreeMap<String, NormalizedRecord>,
) -> BTreeMap<String, Vec<String>> {
    corpus
        .iter()
        .map(|(id, record)| {
            let values = record.subjects.iter().map(|s| s.value.clone()).collect();
            (id.clone(), values)
        })
        .collect()
}

/// The reversed view: each distinct subject value with the record ids
/// it occurs on.
pub fn subjects_by_value(
    corpus: &BTreeMap<String, NormalizedRecord>,
) -> BTreeMap<String, Vec<String>> {
    let mut by_value: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (id, record) in corpus {
        for subject in &record.subjects {
            by_value
                .entry(subject.value.clone())
                .or_default()
                .push(id.clone());
        }
    }
    by_value
}

/// Records whose title or abstract the detector unanimously calls some
/// one non-English language, despite having been selected as the
/// canonical value. Each flagged record maps the offending field to the
/// agreed language code; clean records are absent.
pub fn foreign_language_records(
    corpus: &BTreeMap<String, NormalizedRecord>,
    check: &EnglishCheck,
    detector: &dyn LanguageDetector,
) -> BTreeMap<String, BTreeMap<&'static str, String>> {
    let mut flagged = BTreeMap::new();
    for (id, record) in corpus {
        let mut fields = BTreeMap::new();
        for (name, text) in [
            ("title", record.title.as_deref()),
            ("abstract", record.abstract_text.as_deref()),
        ] {
            let Some(text) = text else { continue };
            if let Some(vote) = check.confident_foreign(detector, text) {
                fields.insert(name, vote.language);
            }
        }
        if !fields.is_empty() {
            flagged.insert(id.clone(), fields);
        }
    }
    flagged
}

/// Contributor entries whose name is actually an email address slip
/// through some repositories; the dumps skip them.
fn real_contributors(record: &NormalizedRecord) -> impl Iterator<Item = &Contributor> {
    record
        .authors
        .iter()
        .filter(|a| a.role != Role::Unknown || !a.name.contains('@'))
}
