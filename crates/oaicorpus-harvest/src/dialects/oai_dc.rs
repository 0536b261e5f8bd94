//! oai_dc reader: flat Dublin Core, no qualifiers, optional `xml:lang`.

use oaicorpus_core::{FieldMap, RawField};
use serde::Deserialize;

use super::MetadataContainer;

#[derive(Debug, Deserialize)]
pub(crate) struct OaiDcMetadata {
    #[serde(rename = "oai_dc:dc", alias = "dc")]
    dc: Option<DcContainer>,
}

/// The `<oai_dc:dc>` payload. Also embedded in DIDL statements, which is
/// why it lives behind a crate-visible type instead of being inlined.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct DcContainer {
    #[serde(rename = "dc:title", alias = "title", default)]
    title: Vec<DcValue>,
    #[serde(rename = "dc:creator", alias = "creator", default)]
    creator: Vec<DcValue>,
    #[serde(rename = "dc:contributor", alias = "contributor", default)]
    contributor: Vec<DcValue>,
    #[serde(rename = "dc:subject", alias = "subject", default)]
    subject: Vec<DcValue>,
    #[serde(rename = "dc:description", alias = "description", default)]
    description: Vec<DcValue>,
    #[serde(rename = "dc:date", alias = "date", default)]
    date: Vec<DcValue>,
    #[serde(rename = "dc:type", alias = "type", default)]
    doc_type: Vec<DcValue>,
    #[serde(rename = "dc:language", alias = "language", default)]
    language: Vec<DcValue>,
    #[serde(rename = "dc:publisher", alias = "publisher", default)]
    publisher: Vec<DcValue>,
    #[serde(rename = "dc:rights", alias = "rights", default)]
    rights: Vec<DcValue>,
    #[serde(rename = "dc:identifier", alias = "identifier", default)]
    identifier: Vec<DcValue>,
}

#[derive(Debug, Deserialize)]
struct DcValue {
    #[serde(rename = "@xml:lang", alias = "@lang")]
    lang: Option<String>,
    #[serde(rename = "$text")]
    text: Option<String>,
}

impl DcContainer {
    pub(crate) fn into_field_map(self) -> FieldMap {
        let mut fields = FieldMap::new();
        let mut push = |element: &str, values: Vec<DcValue>| {
            for value in values {
                let Some(text) = value.text.filter(|t| !t.trim().is_empty()) else {
                    continue;
                };
                fields
                    .entry(element.to_string())
                    .or_default()
                    .push(RawField::new(element, None, value.lang, text));
            }
        };
        push("title", self.title);
        push("creator", self.creator);
        push("contributor", self.contributor);
        push("subject", self.subject);
        push("description", self.description);
        push("date", self.date);
        push("type", self.doc_type);
        push("language", self.language);
        push("publisher", self.publisher);
        push("rights", self.rights);
        push("identifier", self.identifier);
        fields
    }
}

impl MetadataContainer for OaiDcMetadata {
    fn into_fields(self) -> Option<FieldMap> {
        self.dc.map(DcContainer::into_field_map)
    }
}

#[cfg(test)]
mod tests {
    use super::super::parse_page;
    use oaicorpus_core::{Dialect, UNKNOWN};

    const PAGE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<OAI-PMH xmlns="http://www.openarchives.org/OAI/2.0/">
  <responseDate>2021-03-01T10:00:00Z</responseDate>
  <request verb="ListRecords">https://depositonce.tu-berlin.de/oai/request</request>
  <ListRecords>
    <record>
      <header>
        <identifier>oai:depositonce.tu-berlin.de:11303/1</identifier>
        <datestamp>2020-05-04T09:00:00Z</datestamp>
      </header>
      <metadata>
        <oai_dc:dc xmlns:oai_dc="http://www.openarchives.org/OAI/2.0/oai_dc/"
                   xmlns:dc="http://purl.org/dc/elements/1.1/">
          <dc:title xml:lang="en">Traffic flow on urban networks</dc:title>
          <dc:title xml:lang="de">Verkehrsfluss in Stadtnetzen</dc:title>
          <dc:creator>Doe, Jane</dc:creator>
          <dc:date>2020-04-01</dc:date>
          <dc:type>doc-type:doctoralThesis</dc:type>
          <dc:language>en</dc:language>
        </oai_dc:dc>
      </metadata>
    </record>
    <record>
      <header status="deleted">
        <identifier>oai:depositonce.tu-berlin.de:11303/2</identifier>
        <datestamp>2020-05-04T09:00:00Z</datestamp>
      </header>
    </record>
    <resumptionToken completeListSize="9000">page-2-token</resumptionToken>
  </ListRecords>
</OAI-PMH>
"#;

    #[test]
    fn parses_records_and_skips_deleted() {
        let page = parse_page(Dialect::OaiDc, PAGE, "publications_1.xml").unwrap();
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.resumption_token.as_deref(), Some("page-2-token"));

        let (header, fields) = &page.records[0];
        assert_eq!(header.identifier, "oai:depositonce.tu-berlin.de:11303/1");
        let titles = &fields["title"];
        assert_eq!(titles.len(), 2);
        assert_eq!(titles[0].language, "en");
        assert_eq!(titles[1].text, "Verkehrsfluss in Stadtnetzen");
        assert_eq!(fields["creator"][0].qualifier, UNKNOWN);
        assert_eq!(fields["type"][0].text, "doc-type:doctoralThesis");
    }

    #[test]
    fn record_without_container_is_malformed() {
        let broken = PAGE.replace(
            "<oai_dc:dc xmlns:oai_dc=\"http://www.openarchives.org/OAI/2.0/oai_dc/\"\n                   xmlns:dc=\"http://purl.org/dc/elements/1.1/\">",
            "<wrong:notdc xmlns:wrong=\"urn:x\">",
        );
        let broken = broken.replace("</oai_dc:dc>", "</wrong:notdc>");
        let err = parse_page(Dialect::OaiDc, &broken, "publications_1.xml").unwrap_err();
        assert!(matches!(
            err,
            crate::error::HarvestError::MalformedRecord { .. }
        ));
    }
}
