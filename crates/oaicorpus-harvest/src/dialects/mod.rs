//! Record Readers: one per metadata dialect, all sharing the OAI-PMH
//! envelope. A reader turns one harvested page into a flat attribute bag
//! per record; everything downstream works on `FieldMap`s only.

pub mod didl;
pub mod dim;
pub mod oai_dc;
pub mod xoai;

use oaicorpus_core::{Cluster, Dialect, FieldMap, Publisher, PublicationHeader};
use quick_xml::de::from_str;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{HarvestError, Result};

// ─── Envelope ───────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct OaiPmh<M> {
    #[serde(rename = "ListRecords")]
    list_records: Option<ListRecords<M>>,
    error: Option<ResponseError>,
}

#[derive(Debug, Deserialize)]
struct ListRecords<M> {
    #[serde(rename = "record", default = "Vec::new")]
    records: Vec<OaiRecord<M>>,
    #[serde(rename = "resumptionToken")]
    resumption_token: Option<ResumptionToken>,
}

#[derive(Debug, Deserialize)]
struct OaiRecord<M> {
    header: RecordHeader,
    metadata: Option<M>,
}

#[derive(Debug, Deserialize)]
struct RecordHeader {
    identifier: String,
    #[serde(rename = "@status")]
    status: Option<String>,
}

impl RecordHeader {
    fn is_deleted(&self) -> bool {
        self.status.as_deref() == Some("deleted")
    }
}

#[derive(Debug, Deserialize)]
struct ResumptionToken {
    #[serde(rename = "$text")]
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseError {
    #[serde(rename = "@code")]
    code: Option<String>,
    #[serde(rename = "$text")]
    message: Option<String>,
}

// ─── Page parsing ───────────────────────────────────────────

/// One parsed harvest page: the surviving records plus the continuation
/// cursor, if any.
#[derive(Debug)]
pub struct ParsedPage {
    pub records: Vec<(PublicationHeader, FieldMap)>,
    pub resumption_token: Option<String>,
}

/// Dialect-specific metadata payload of one record.
trait MetadataContainer {
    /// Flatten into the dialect-independent attribute bag, or `None`
    /// when the expected inner container is missing.
    fn into_fields(self) -> Option<FieldMap>;
}

/// Parse one page of the given dialect. Deleted records are dropped
/// here; a live record without its metadata container aborts the file.
pub fn parse_page(dialect: Dialect, xml: &str, file: &str) -> Result<ParsedPage> {
    match dialect {
        Dialect::OaiDc => parse_with::<oai_dc::OaiDcMetadata>(xml, file),
        Dialect::Dim => parse_with::<dim::DimMetadata>(xml, file),
        Dialect::Didl => parse_with::<didl::DidlMetadata>(xml, file),
        Dialect::Xoai => parse_with::<xoai::XoaiMetadata>(xml, file),
    }
}

fn parse_with<M>(xml: &str, file: &str) -> Result<ParsedPage>
where
    M: DeserializeOwned + MetadataContainer,
{
    let doc: OaiPmh<M> = from_str(xml).map_err(|e| HarvestError::Parse(format!("{file}: {e}")))?;
    if let Some(error) = doc.error {
        return Err(HarvestError::Api(
            file.to_string(),
            format!(
                "{}: {}",
                error.code.unwrap_or_default(),
                error.message.unwrap_or_default()
            ),
        ));
    }
    let listing = doc
        .list_records
        .ok_or_else(|| HarvestError::Parse(format!("{file}: no ListRecords element")))?;

    let mut records = Vec::with_capacity(listing.records.len());
    for record in listing.records {
        if record.header.is_deleted() {
            continue;
        }
        let header = PublicationHeader {
            identifier: record.header.identifier.clone(),
            is_deleted: false,
        };
        let fields = record
            .metadata
            .and_then(MetadataContainer::into_fields)
            .ok_or_else(|| HarvestError::MalformedRecord {
                file: file.to_string(),
                detail: format!("record {} has no metadata container", header.identifier),
            })?;
        records.push((header, fields));
    }

    Ok(ParsedPage {
        records,
        resumption_token: listing
            .resumption_token
            .and_then(|t| t.value)
            .filter(|t| !t.is_empty()),
    })
}

/// Extract only the continuation cursor of a page, ignoring the records.
/// The harvest loop persists raw pages and does not need the payload.
pub fn page_resumption_token(xml: &str) -> Result<Option<String>> {
    #[derive(Debug, Deserialize)]
    struct TokenOnlyListing {
        #[serde(rename = "resumptionToken")]
        resumption_token: Option<ResumptionToken>,
    }
    #[derive(Debug, Deserialize)]
    struct TokenOnly {
        #[serde(rename = "ListRecords")]
        list_records: Option<TokenOnlyListing>,
    }

    let doc: TokenOnly = from_str(xml).map_err(|e| HarvestError::Parse(e.to_string()))?;
    Ok(doc
        .list_records
        .and_then(|l| l.resumption_token)
        .and_then(|t| t.value)
        .filter(|t| !t.is_empty()))
}

// ─── Publisher resolution ───────────────────────────────────

/// Per-dialect publisher resolution, selected by the dialect tag.
///
/// Theses publish through their university (`publisher` element);
/// publications carry a (journal title, publisher name) pair whose
/// location differs per dialect. DIDL carries neither, which is a valid
/// outcome, not an error.
pub fn resolve_publisher(dialect: Dialect, cluster: Cluster, fields: &FieldMap) -> Publisher {
    fn first_text<'a>(fields: &'a FieldMap, element: &str) -> Option<&'a str> {
        fields
            .get(element)
            .and_then(|f| f.first())
            .map(|f| f.text.as_str())
    }
    fn first_qualified<'a>(fields: &'a FieldMap, element: &str, qualifier: &str) -> Option<&'a str> {
        fields
            .get(element)?
            .iter()
            .find(|f| f.qualifier == qualifier)
            .map(|f| f.text.as_str())
    }

    match (dialect, cluster) {
        (Dialect::Didl, _) => Publisher::default(),
        (_, Cluster::Thesis) => Publisher {
            title: None,
            name: first_text(fields, "publisher").map(str::to_string),
        },
        (Dialect::Dim, _) => Publisher {
            title: first_qualified(fields, "bibliographicCitation", "journaltitle")
                .map(str::to_string),
            name: first_qualified(fields, "bibliographicCitation", "publishername")
                .map(str::to_string),
        },
        (Dialect::Xoai, _) => Publisher {
            title: first_text(fields, "container-title").map(str::to_string),
            name: first_text(fields, "container-publisher-name").map(str::to_string),
        },
        (Dialect::OaiDc, _) => Publisher {
            title: None,
            name: first_text(fields, "publisher").map(str::to_string),
        },
    }
}
