//! Entity extraction: one normalized record per parsed source document.

use oaicorpus_core::{
    Cluster, Contributor, Dialect, FieldMap, NormalizedRecord, PublicationHeader, RawField, Role,
    Subject, TypeTable, UNKNOWN,
};

use crate::classify::classify;
use crate::ddc::extract_ddc;
use crate::dialects::resolve_publisher;
use crate::error::Result;
use crate::language::{EnglishCheck, LanguageDetector};
use crate::select::select_preferring_short;

/// Outcome of extracting one source document.
#[derive(Debug)]
pub enum Extraction {
    Record(NormalizedRecord),
    /// The document carries a type outside the corpus (file-version
    /// markers, rejected clusters) or no type at all. Not an error.
    Rejected { id: String, reason: String },
}

pub struct Extractor<'a> {
    table: &'a TypeTable,
    check: EnglishCheck,
    detector: &'a dyn LanguageDetector,
}

impl<'a> Extractor<'a> {
    pub fn new(
        table: &'a TypeTable,
        check: EnglishCheck,
        detector: &'a dyn LanguageDetector,
    ) -> Self {
        Self {
            table,
            check,
            detector,
        }
    }

    /// Builds the canonical record for one document. Returns
    /// [`Extraction::Rejected`] for out-of-corpus document types; all
    /// other fields are best-effort and may stay empty.
    pub fn extract(
        &self,
        header: &PublicationHeader,
        fields: &FieldMap,
        dialect: Dialect,
    ) -> Result<Extraction> {
        let id = header.identifier.clone();

        let Some(type_field) = fields.get("type").and_then(|f| f.first()) else {
            tracing::warn!(id, "document has no type field, rejecting");
            return Ok(Extraction::Rejected {
                id,
                reason: "no type field".to_string(),
            });
        };
        let doc_type = classify(&type_field.text, self.table)?;
        if doc_type.cluster == Cluster::Rejected {
            return Ok(Extraction::Rejected {
                id,
                reason: doc_type.raw_label,
            });
        }

        let title = self.select_title(fields);
        let date = select_date(fields, dialect);
        if date.is_none() {
            tracing::warn!(id, "document has no issued date");
        }
        let publisher = resolve_publisher(dialect, doc_type.cluster, fields);

        Ok(Extraction::Record(NormalizedRecord {
            id,
            doc_type,
            title,
            abstract_text: self.select_abstract(fields),
            date,
            authors: collect_contributors(fields),
            subjects: collect_subjects(fields),
            rights: select_rights(fields),
            publisher,
        }))
    }

    fn select_title(&self, fields: &FieldMap) -> Option<String> {
        let candidates: Vec<RawField> = fields
            .get("title")
            .map(|titles| {
                titles
                    .iter()
                    .filter(|t| t.qualifier != "subtitle")
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        select_preferring_short(&candidates, &self.check, self.detector).map(str::to_string)
    }

    /// The first explicitly English-tagged abstract, looking at the
    /// dedicated abstract element first and falling back to
    /// abstract-shaped description fields.
    fn select_abstract(&self, fields: &FieldMap) -> Option<String> {
        abstract_candidates(fields)
            .find(|f| f.is_english_tagged())
            .map(|f| f.text.clone())
    }
}

pub(crate) fn abstract_candidates(fields: &FieldMap) -> impl Iterator<Item = &RawField> {
    let dedicated = fields.get("abstract").map(Vec::as_slice).unwrap_or(&[]);
    let descriptions = fields
        .get("description")
        .map(Vec::as_slice)
        .unwrap_or(&[]);
    dedicated.iter().chain(
        descriptions
            .iter()
            .filter(|f| f.qualifier == "abstract" || f.qualifier == UNKNOWN),
    )
}

fn select_date(fields: &FieldMap, dialect: Dialect) -> Option<String> {
    let dates = fields.get("date")?;
    if let Some(issued) = dates.iter().find(|d| d.qualifier == "issued") {
        return Some(issued.text.clone());
    }
    // The flat dialect never qualifies its dates.
    if dialect == Dialect::OaiDc {
        return dates
            .iter()
            .find(|d| d.qualifier == UNKNOWN)
            .map(|d| d.text.clone());
    }
    None
}

fn collect_contributors(fields: &FieldMap) -> Vec<Contributor> {
    let creators = fields
        .get("creator")
        .into_iter()
        .flatten()
        .map(|f| Contributor {
            name: f.text.clone(),
            role: Role::Author,
        });
    let contributors = fields
        .get("contributor")
        .into_iter()
        .flatten()
        .filter(|f| f.qualifier != "gender" && f.qualifier != "contact")
        .map(|f| Contributor {
            name: f.text.clone(),
            role: Role::from_qualifier(&f.qualifier),
        });
    creators.chain(contributors).collect()
}

fn collect_subjects(fields: &FieldMap) -> Vec<Subject> {
    fields
        .get("subject")
        .into_iter()
        .flatten()
        .filter(|f| f.is_english_or_untagged())
        .map(|f| {
            let value = if f.qualifier == "ddc" {
                extract_ddc(&f.text).unwrap_or_else(|| f.text.clone())
            } else {
                f.text.clone()
            };
            Subject {
                value,
                qualifier: f.qualifier.clone(),
            }
        })
        .collect()
}

/// Prefers the explicitly URI-qualified rights entry, then anything
/// that looks like a URL, then whatever comes first.
fn select_rights(fields: &FieldMap) -> Option<String> {
    let rights = fields.get("rights")?;
    rights
        .iter()
        .find(|r| r.qualifier == "uri")
        .or_else(|| rights.iter().find(|r| r.text.starts_with("http")))
        .or_else(|| rights.first())
        .map(|r| r.text.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::{Detection, WhatlangDetector};
    use oaicorpus_core::DetectorConfig;
    use std::collections::BTreeMap;

    struct AlwaysGerman;

    impl LanguageDetector for AlwaysGerman {
        fn detect(&self, _text: &str) -> Option<Detection> {
            Some(Detection {
                language: "de".to_string(),
                confidence: 0.999,
            })
        }
    }

    fn table() -> TypeTable {
        TypeTable::from_clusters(
            [
                (
                    "thesis".to_string(),
                    vec!["doctoralthesis".to_string()],
                ),
                ("publication".to_string(), vec!["article".to_string()]),
                ("rejected".to_string(), vec!["other".to_string()]),
            ]
            .into_iter()
            .collect(),
        )
        .unwrap()
    }

    fn header(id: &str) -> PublicationHeader {
        PublicationHeader {
            identifier: id.to_string(),
            is_deleted: false,
        }
    }

    fn rf(
        element: &str,
        qualifier: Option<&str>,
        language: Option<&str>,
        text: &str,
    ) -> RawField {
        RawField::new(
            element,
            qualifier.map(str::to_string),
            language.map(str::to_string),
            text,
        )
    }

    fn fields(entries: Vec<RawField>) -> FieldMap {
        let mut map: FieldMap = BTreeMap::new();
        for entry in entries {
            map.entry(entry.element.clone()).or_default().push(entry);
        }
        map
    }

    fn thesis_fields() -> FieldMap {
        fields(vec![
            rf("type", None, None, "doctoralThesis"),
            rf("title", None, Some("de"), "Der Baum"),
            rf("title", None, Some("en"), "The Tree"),
            rf("title", Some("subtitle"), Some("en"), "A Subtitle"),
            rf("date", Some("issued"), None, "2021-03-01"),
            rf("date", Some("accessioned"), None, "2021-04-01"),
            rf("contributor", Some("author"), None, "Doe, Jane"),
            rf("contributor", Some("firstReferee"), None, "Roe, Richard"),
            rf("contributor", Some("gender"), None, "f"),
            rf("subject", Some("ddc"), None, "620.1 Engineering"),
            rf("subject", None, Some("en"), "mechanics"),
            rf("subject", None, Some("de"), "Mechanik"),
            rf("rights", Some("uri"), None, "http://rightsstatements.org/vocab/InC/1.0/"),
            rf("publisher", None, None, "Example University"),
            rf("abstract", None, Some("en"), "We study trees."),
        ])
    }

    #[test]
    fn thesis_record_is_fully_assembled() {
        let table = table();
        let detector = WhatlangDetector;
        let extractor = Extractor::new(
            &table,
            EnglishCheck::new(&DetectorConfig::default()),
            &detector,
        );
        let extraction = extractor
            .extract(&header("oai:example:1"), &thesis_fields(), Dialect::Dim)
            .unwrap();
        let Extraction::Record(record) = extraction else {
            panic!("expected a record");
        };
        assert_eq!(record.title.as_deref(), Some("The Tree"));
        assert_eq!(record.date.as_deref(), Some("2021-03-01"));
        assert_eq!(record.abstract_text.as_deref(), Some("We study trees."));
        assert_eq!(record.rights.as_deref(), Some("http://rightsstatements.org/vocab/InC/1.0/"));
        assert_eq!(record.publisher.name.as_deref(), Some("Example University"));
        assert_eq!(record.doc_type.cluster, Cluster::Thesis);

        let roles: Vec<_> = record.authors.iter().map(|a| a.role.clone()).collect();
        assert_eq!(roles, vec![Role::Author, Role::Referee]);

        let subjects: Vec<_> = record.subjects.iter().map(|s| s.value.as_str()).collect();
        assert_eq!(subjects, vec!["620.1", "mechanics"]);
    }

    #[test]
    fn extraction_is_deterministic_over_the_same_input() {
        let table = table();
        let detector = WhatlangDetector;
        let extractor = Extractor::new(
            &table,
            EnglishCheck::new(&DetectorConfig::default()),
            &detector,
        );
        let map = thesis_fields();
        let first = extractor
            .extract(&header("oai:example:1"), &map, Dialect::Dim)
            .unwrap();
        let second = extractor
            .extract(&header("oai:example:1"), &map, Dialect::Dim)
            .unwrap();
        let (Extraction::Record(first), Extraction::Record(second)) = (first, second) else {
            panic!("expected records");
        };
        assert_eq!(first, second);
    }

    #[test]
    fn rejected_type_short_circuits_extraction() {
        let table = table();
        let detector = WhatlangDetector;
        let extractor = Extractor::new(
            &table,
            EnglishCheck::new(&DetectorConfig::default()),
            &detector,
        );
        let map = fields(vec![rf("type", None, None, "other")]);
        let extraction = extractor
            .extract(&header("oai:example:2"), &map, Dialect::Dim)
            .unwrap();
        assert!(matches!(extraction, Extraction::Rejected { .. }));
    }

    #[test]
    fn missing_type_rejects_instead_of_failing() {
        let table = table();
        let detector = WhatlangDetector;
        let extractor = Extractor::new(
            &table,
            EnglishCheck::new(&DetectorConfig::default()),
            &detector,
        );
        let map = fields(vec![rf("title", None, None, "Untyped")]);
        let extraction = extractor
            .extract(&header("oai:example:3"), &map, Dialect::OaiDc)
            .unwrap();
        assert!(matches!(extraction, Extraction::Rejected { .. }));
    }

    #[test]
    fn flat_dialect_falls_back_to_unqualified_dates() {
        let map = fields(vec![rf("date", None, None, "2019")]);
        assert_eq!(select_date(&map, Dialect::OaiDc).as_deref(), Some("2019"));
        assert_eq!(select_date(&map, Dialect::Dim), None);
    }

    #[test]
    fn ddc_subject_without_a_number_keeps_its_text() {
        let map = fields(vec![rf("subject", Some("ddc"), None, "Engineering")]);
        let subjects = collect_subjects(&map);
        assert_eq!(subjects[0].value, "Engineering");
    }

    #[test]
    fn rights_prefer_uri_qualifier_over_order() {
        let map = fields(vec![
            rf("rights", None, None, "All rights reserved"),
            rf("rights", Some("uri"), None, "http://example.org/license"),
        ]);
        assert_eq!(
            select_rights(&map).as_deref(),
            Some("http://example.org/license")
        );
    }

    #[test]
    fn untagged_titles_fall_back_to_the_shortest() {
        let table = table();
        let check = EnglishCheck::new(&DetectorConfig::default());
        let extractor = Extractor::new(&table, check, &AlwaysGerman);
        let map = fields(vec![
            rf("title", None, None, "Ein etwas laengerer Titel"),
            rf("title", None, None, "Kurz"),
            rf("type", None, None, "article"),
        ]);
        let Extraction::Record(record) = extractor
            .extract(&header("oai:example:4"), &map, Dialect::Dim)
            .unwrap()
        else {
            panic!("expected a record");
        };
        assert_eq!(record.title.as_deref(), Some("Kurz"));
    }
}
