//! xOAI reader: a recursive element tree. Under the `dc` container each
//! level narrows the field: element name, then optionally a qualifier,
//! then optionally a language bucket (`en`, `de`, `en_US`, `none`),
//! with the value in a leaf `<field name="value">`.

use oaicorpus_core::{FieldMap, RawField};
use serde::Deserialize;

use super::MetadataContainer;

#[derive(Debug, Deserialize)]
pub(crate) struct XoaiMetadata {
    #[serde(rename = "metadata", alias = "xoai:metadata")]
    inner: Option<XoaiContainer>,
}

#[derive(Debug, Deserialize)]
struct XoaiContainer {
    #[serde(rename = "element", default)]
    elements: Vec<XoaiElement>,
}

#[derive(Debug, Deserialize)]
struct XoaiElement {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "element", default)]
    children: Vec<XoaiElement>,
    #[serde(rename = "field", default)]
    fields: Vec<XoaiField>,
}

#[derive(Debug, Deserialize)]
struct XoaiField {
    #[serde(rename = "@name")]
    name: Option<String>,
    #[serde(rename = "$text")]
    text: Option<String>,
}

/// Language tag of an innermost bucket. `none` means untagged; locale
/// spellings like `en_US` collapse to their primary subtag. Only the
/// innermost level of the tree is a language bucket; qualifier names
/// such as `ddc` always carry a bucket below them, so the shape of the
/// tree, not the name, decides what a level means.
fn bucket_language(name: &str) -> Option<String> {
    if name == "none" {
        return None;
    }
    let primary = name.split('_').next().unwrap_or(name);
    Some(primary.to_ascii_lowercase())
}

fn push_values(
    fields: &mut FieldMap,
    element: &str,
    qualifier: Option<&str>,
    language: Option<&str>,
    leaves: &[XoaiField],
) {
    for leaf in leaves {
        if leaf.name.as_deref() != Some("value") {
            continue;
        }
        let Some(text) = leaf.text.as_deref().filter(|t| !t.trim().is_empty()) else {
            continue;
        };
        fields
            .entry(element.to_string())
            .or_default()
            .push(RawField::new(
                element,
                qualifier.map(str::to_string),
                language.map(str::to_string),
                text,
            ));
    }
}

fn walk_field_element(fields: &mut FieldMap, element: &XoaiElement) {
    push_values(fields, &element.name, None, None, &element.fields);
    for child in &element.children {
        if child.children.is_empty() {
            // Innermost level directly under the element: language bucket.
            let language = bucket_language(&child.name);
            push_values(fields, &element.name, None, language.as_deref(), &child.fields);
        } else {
            // Qualifier level with language buckets below.
            push_values(fields, &element.name, Some(&child.name), None, &child.fields);
            for grandchild in &child.children {
                let language = bucket_language(&grandchild.name);
                push_values(
                    fields,
                    &element.name,
                    Some(&child.name),
                    language.as_deref(),
                    &grandchild.fields,
                );
            }
        }
    }
}

impl MetadataContainer for XoaiMetadata {
    fn into_fields(self) -> Option<FieldMap> {
        let container = self.inner?;
        let dc = container.elements.into_iter().find(|e| e.name == "dc")?;
        let mut fields = FieldMap::new();
        for element in &dc.children {
            walk_field_element(&mut fields, element);
        }
        Some(fields)
    }
}
