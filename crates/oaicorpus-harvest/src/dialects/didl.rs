//! DIDL reader: an MPEG-21 item wrapping a plain Dublin Core statement
//! plus the full-text resource link. The DC payload sits in the item's
//! descriptors; the component resources carry `ref` attributes.

use oaicorpus_core::{FieldMap, RawField};
use serde::Deserialize;

use super::MetadataContainer;
use super::oai_dc::DcContainer;

#[derive(Debug, Deserialize)]
pub(crate) struct DidlMetadata {
    #[serde(rename = "didl:DIDL", alias = "DIDL")]
    didl: Option<Didl>,
}

#[derive(Debug, Deserialize)]
struct Didl {
    #[serde(rename = "didl:Item", alias = "Item")]
    item: Option<DidlItem>,
}

#[derive(Debug, Deserialize)]
struct DidlItem {
    #[serde(rename = "didl:Descriptor", alias = "Descriptor", default)]
    descriptors: Vec<Descriptor>,
    #[serde(rename = "didl:Component", alias = "Component", default)]
    components: Vec<Component>,
    #[serde(rename = "didl:Item", alias = "Item", default)]
    items: Vec<DidlItem>,
}

#[derive(Debug, Deserialize)]
struct Descriptor {
    #[serde(rename = "didl:Statement", alias = "Statement")]
    statement: Option<Statement>,
}

#[derive(Debug, Deserialize)]
struct Statement {
    #[serde(rename = "oai_dc:dc", alias = "dc")]
    dc: Option<DcContainer>,
}

#[derive(Debug, Deserialize)]
struct Component {
    #[serde(rename = "didl:Resource", alias = "Resource", default)]
    resources: Vec<Resource>,
}

#[derive(Debug, Deserialize)]
struct Resource {
    #[serde(rename = "@ref")]
    reference: Option<String>,
    #[serde(rename = "@mimeType")]
    mime_type: Option<String>,
}

impl DidlItem {
    fn collect(self, fields: &mut FieldMap, found_dc: &mut bool) {
        for descriptor in self.descriptors {
            let Some(dc) = descriptor.statement.and_then(|s| s.dc) else {
                continue;
            };
            *found_dc = true;
            for (element, values) in dc.into_field_map() {
                fields.entry(element).or_default().extend(values);
            }
        }
        for component in self.components {
            for resource in component.resources {
                let Some(reference) = resource.reference else {
                    continue;
                };
                fields
                    .entry("resource".to_string())
                    .or_default()
                    .push(RawField::new(
                        "resource",
                        resource.mime_type,
                        None,
                        reference,
                    ));
            }
        }
        for item in self.items {
            item.collect(fields, found_dc);
        }
    }
}

impl MetadataContainer for DidlMetadata {
    fn into_fields(self) -> Option<FieldMap> {
        let item = self.didl?.item?;
        let mut fields = FieldMap::new();
        let mut found_dc = false;
        item.collect(&mut fields, &mut found_dc);
        // An item without any DC statement is as malformed as a missing
        // DIDL envelope.
        found_dc.then_some(fields)
    }
}
