//! DIM reader: one flat list of `<dim:field>` elements carrying
//! element/qualifier/lang attributes, the richest of the four dialects.

use oaicorpus_core::{FieldMap, RawField};
use serde::Deserialize;

use super::MetadataContainer;

#[derive(Debug, Deserialize)]
pub(crate) struct DimMetadata {
    #[serde(rename = "dim:dim", alias = "dim")]
    dim: Option<DimContainer>,
}

#[derive(Debug, Deserialize)]
struct DimContainer {
    #[serde(rename = "dim:field", alias = "field", default)]
    fields: Vec<DimField>,
}

#[derive(Debug, Deserialize)]
struct DimField {
    #[serde(rename = "@element")]
    element: String,
    #[serde(rename = "@qualifier")]
    qualifier: Option<String>,
    #[serde(rename = "@lang")]
    lang: Option<String>,
    #[serde(rename = "$text")]
    text: Option<String>,
}

impl MetadataContainer for DimMetadata {
    fn into_fields(self) -> Option<FieldMap> {
        let container = self.dim?;
        let mut fields = FieldMap::new();
        for field in container.fields {
            let Some(text) = field.text.filter(|t| !t.trim().is_empty()) else {
                continue;
            };
            fields
                .entry(field.element.clone())
                .or_default()
                .push(RawField::new(field.element, field.qualifier, field.lang, text));
        }
        Some(fields)
    }
}
