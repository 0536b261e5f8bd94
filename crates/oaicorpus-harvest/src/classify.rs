//! Document-type classification against the validated type table.

use oaicorpus_core::{Cluster, DocType, TypeTable, normalize_label};

use crate::error::{HarvestError, Result};

/// Maps a raw type label onto its cluster.
///
/// Labels containing "version" (file-version markers, not document
/// types) are tolerated and land in [`Cluster::Rejected`] without
/// touching the table. Any other label the table does not know is a
/// hard error so the table gets extended instead of records silently
/// vanishing.
pub fn classify(raw_label: &str, table: &TypeTable) -> Result<DocType> {
    let normalized = normalize_label(raw_label);
    if normalized.contains("version") {
        return Ok(DocType {
            raw_label: raw_label.to_string(),
            cluster: Cluster::Rejected,
        });
    }
    match table.cluster_of(&normalized) {
        Some(cluster) => Ok(DocType {
            raw_label: raw_label.to_string(),
            cluster,
        }),
        None => Err(HarvestError::UnknownTypeLabel(raw_label.to_string())),
    }
}
