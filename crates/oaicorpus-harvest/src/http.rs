use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tokio::time::sleep;

use crate::error::{HarvestError, Result};

// ─── RateLimitedClient ──────────────────────────────────────

/// HTTP GET client with polite request spacing and a bounded retry
/// budget. Transient failures back off exponentially; once the budget is
/// spent the error surfaces to the caller, which may skip the document.
pub struct RateLimitedClient {
    client: reqwest::Client,
    min_interval: Duration,
    last_request: Arc<Mutex<Option<Instant>>>,
    max_retries: u32,
}

impl RateLimitedClient {
    pub fn new(min_interval: Duration, max_retries: u32, user_agent: &str) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .gzip(true)
            .build()
            .expect("failed to build reqwest client");
        Self {
            client,
            min_interval,
            last_request: Arc::new(Mutex::new(None)),
            max_retries,
        }
    }

    async fn wait_for_rate_limit(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(t) = *last {
            let elapsed = t.elapsed();
            if elapsed < self.min_interval {
                sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    pub async fn get(&self, url: &str) -> Result<String> {
        let mut attempt = 0u32;
        loop {
            self.wait_for_rate_limit().await;
            match self.client.get(url).send().await {
                // Flow-control answers are transient; wait and retry
                // within the same budget.
                Ok(r) if r.status() == 429 || r.status() == 503 => {
                    let status = r.status().as_u16();
                    if attempt >= self.max_retries {
                        return Err(HarvestError::Api(
                            url.to_string(),
                            format!("HTTP {status}: retry budget exhausted"),
                        ));
                    }
                    let wait = r
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or_else(|| 2u64.pow(attempt));
                    tracing::warn!(url, status, attempt, "server busy, retrying in {wait}s");
                    sleep(Duration::from_secs(wait)).await;
                    attempt += 1;
                }
                Ok(r) if !r.status().is_success() => {
                    let status = r.status().as_u16();
                    let body = r.text().await.unwrap_or_default();
                    return Err(HarvestError::Api(
                        url.to_string(),
                        format!("HTTP {status}: {body}"),
                    ));
                }
                Ok(r) => return r.text().await.map_err(HarvestError::Http),
                Err(e) => {
                    if attempt >= self.max_retries {
                        return Err(HarvestError::Http(e));
                    }
                    let backoff = 2u64.pow(attempt);
                    tracing::warn!(url, attempt, "transient fetch failure, retrying in {backoff}s");
                    sleep(Duration::from_secs(backoff)).await;
                    attempt += 1;
                }
            }
        }
    }
}
