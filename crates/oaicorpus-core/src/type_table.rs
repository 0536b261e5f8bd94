use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{CoreError, Result};
use crate::models::Cluster;

/// Immutable type-synonym table: normalized raw type labels mapped to
/// their cluster. Built once from a JSON file of the shape
/// `{"thesis": [...], "publication": [...], "rejected": [...]}` and
/// validated on construction. The table is data, not code, so new
/// vocabulary lands here without a release.
#[derive(Debug, Clone)]
pub struct TypeTable {
    labels: BTreeMap<String, Cluster>,
}

/// Label normalization shared by the table loader and the classifier:
/// lowercase, spaces stripped, literal `doc-type:` prefix stripped.
pub fn normalize_label(raw: &str) -> String {
    raw.to_lowercase().replace(' ', "").replace("doc-type:", "")
}

impl TypeTable {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let clusters: BTreeMap<String, Vec<String>> = serde_json::from_str(&raw)?;
        Self::from_clusters(clusters)
    }

    /// Build and validate the table. Every normalized label must map to
    /// exactly one cluster; a duplicate across clusters is a
    /// configuration error, not a precedence question.
    pub fn from_clusters(clusters: BTreeMap<String, Vec<String>>) -> Result<Self> {
        let mut labels = BTreeMap::new();
        for (name, entries) in clusters {
            let cluster = match name.as_str() {
                "thesis" => Cluster::Thesis,
                "publication" => Cluster::Publication,
                "rejected" => Cluster::Rejected,
                other => {
                    return Err(CoreError::TypeTable(format!("unknown cluster: {other}")));
                }
            };
            for entry in entries {
                let label = normalize_label(&entry);
                if label.is_empty() {
                    return Err(CoreError::TypeTable(format!(
                        "label {entry:?} normalizes to the empty string"
                    )));
                }
                if let Some(previous) = labels.insert(label.clone(), cluster) {
                    if previous != cluster {
                        return Err(CoreError::TypeTable(format!(
                            "label {label:?} maps to both {previous:?} and {cluster:?}"
                        )));
                    }
                }
            }
        }
        Ok(Self { labels })
    }

    /// Cluster for an already-normalized label.
    pub fn cluster_of(&self, normalized: &str) -> Option<Cluster> {
        self.labels.get(normalized).copied()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clusters(entries: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
        entries
            .iter()
            .map(|(name, labels)| {
                (
                    name.to_string(),
                    labels.iter().map(|l| l.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn labels_are_normalized_at_load() {
        let table = TypeTable::from_clusters(clusters(&[
            ("thesis", &["doc-type:Master Thesis"]),
            ("publication", &["article"]),
        ]))
        .unwrap();
        assert_eq!(table.cluster_of("masterthesis"), Some(Cluster::Thesis));
        assert_eq!(table.cluster_of("article"), Some(Cluster::Publication));
        assert_eq!(table.cluster_of("unheard-of"), None);
    }

    #[test]
    fn duplicate_label_across_clusters_is_rejected() {
        let err = TypeTable::from_clusters(clusters(&[
            ("thesis", &["report"]),
            ("publication", &["Report"]),
        ]))
        .unwrap_err();
        assert!(matches!(err, CoreError::TypeTable(_)));
    }

    #[test]
    fn duplicate_label_within_one_cluster_is_fine() {
        let table = TypeTable::from_clusters(clusters(&[(
            "rejected",
            &["image", "doc-type:image"],
        )]))
        .unwrap();
        assert_eq!(table.cluster_of("image"), Some(Cluster::Rejected));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn loads_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clustered_types.json");
        std::fs::write(
            &path,
            r#"{"thesis": ["doc-type:doctoralThesis"], "publication": ["article"], "rejected": ["doc-type:image"]}"#,
        )
        .unwrap();
        let table = TypeTable::load(&path).unwrap();
        assert_eq!(table.cluster_of("doctoralthesis"), Some(Cluster::Thesis));
        assert_eq!(table.cluster_of("image"), Some(Cluster::Rejected));
    }

    #[test]
    fn unknown_cluster_name_is_an_error() {
        let err = TypeTable::from_clusters(clusters(&[("misc", &["thing"])])).unwrap_err();
        assert!(matches!(err, CoreError::TypeTable(_)));
    }
}
