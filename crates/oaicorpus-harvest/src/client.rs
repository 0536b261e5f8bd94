//! OAI-PMH page harvester: walks a repository's ListRecords pagination
//! and stores each page verbatim for later offline processing.

use std::path::Path;
use std::time::Duration;

use oaicorpus_core::RepositoryConfig;

use crate::dialects::page_resumption_token;
use crate::error::Result;
use crate::http::RateLimitedClient;

const USER_AGENT: &str = concat!("oaicorpus/", env!("CARGO_PKG_VERSION"));

pub struct OaiClient {
    http: RateLimitedClient,
}

impl OaiClient {
    pub fn new(min_interval: Duration, max_retries: u32) -> Self {
        Self {
            http: RateLimitedClient::new(min_interval, max_retries, USER_AGENT),
        }
    }

    /// Fetches every ListRecords page of `repo` into its pages
    /// directory as `publications_<n>.xml`, following resumption tokens
    /// until the repository stops issuing them. Returns the page count.
    pub async fn harvest(&self, repo: &RepositoryConfig, data_dir: &Path) -> Result<usize> {
        let dir = repo.pages_dir(data_dir);
        std::fs::create_dir_all(&dir)?;

        let mut url = format!(
            "{}?verb=ListRecords&metadataPrefix={}",
            repo.base_url,
            repo.dialect.metadata_prefix()
        );
        let mut page = 0usize;
        loop {
            tracing::info!(repository = repo.name, page, "fetching page");
            let body = self.http.get(&url).await?;
            let token = page_resumption_token(&body)?;
            std::fs::write(dir.join(format!("publications_{page}.xml")), &body)?;
            page += 1;
            match token {
                Some(token) => {
                    url = format!("{}?verb=ListRecords&resumptionToken={token}", repo.base_url);
                }
                None => break,
            }
        }
        tracing::info!(repository = repo.name, pages = page, "harvest complete");
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oaicorpus_core::Dialect;

    const FIRST_PAGE: &str = r#"<?xml version="1.0"?>
<OAI-PMH xmlns="http://www.openarchives.org/OAI/2.0/">
  <ListRecords>
    <record><header><identifier>oai:alpha:1</identifier></header></record>
    <resumptionToken>cursor-100</resumptionToken>
  </ListRecords>
</OAI-PMH>"#;

    const LAST_PAGE: &str = r#"<?xml version="1.0"?>
<OAI-PMH xmlns="http://www.openarchives.org/OAI/2.0/">
  <ListRecords>
    <record><header><identifier>oai:alpha:2</identifier></header></record>
  </ListRecords>
</OAI-PMH>"#;

    #[tokio::test]
    async fn pagination_follows_the_resumption_token() {
        let mut server = mockito::Server::new_async().await;
        let first = server
            .mock("GET", "/oai?verb=ListRecords&metadataPrefix=oai_dc")
            .with_body(FIRST_PAGE)
            .create_async()
            .await;
        let second = server
            .mock("GET", "/oai?verb=ListRecords&resumptionToken=cursor-100")
            .with_body(LAST_PAGE)
            .create_async()
            .await;

        let data_dir = tempfile::tempdir().unwrap();
        let repo = RepositoryConfig {
            name: "alpha".to_string(),
            base_url: format!("{}/oai", server.url()),
            namespace: "oai:alpha:".to_string(),
            dialect: Dialect::OaiDc,
        };

        let client = OaiClient::new(Duration::from_millis(0), 1);
        let pages = client.harvest(&repo, data_dir.path()).await.unwrap();

        first.assert_async().await;
        second.assert_async().await;
        assert_eq!(pages, 2);
        let stored = std::fs::read_to_string(
            repo.pages_dir(data_dir.path()).join("publications_1.xml"),
        )
        .unwrap();
        assert!(stored.contains("oai:alpha:2"));
    }
}
