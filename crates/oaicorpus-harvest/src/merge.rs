//! Cross-repository corpus merge.

use std::collections::BTreeMap;

use oaicorpus_core::NormalizedRecord;

/// Folds per-repository corpora into one map. Later corpora overwrite
/// earlier ones on identifier collision; repository namespaces make
/// collisions unlikely in practice, but a collision must never abort a
/// merge.
pub fn merge(
    per_repository: Vec<BTreeMap<String, NormalizedRecord>>,
) -> BTreeMap<String, NormalizedRecord> {
    let mut merged = BTreeMap::new();
    for corpus in per_repository {
        for (id, record) in corpus {
            if merged.insert(id.clone(), record).is_some() {
                tracing::warn!(id, "identifier collision across repositories, keeping later record");
            }
        }
    }
    merged
}
