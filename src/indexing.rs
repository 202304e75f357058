use crate::config::FetchConfig;
use anyhow::Result;
use reqwest::Client;
use std::time::Duration;

/// Live search-engine indexing check. Returns `Some(true)` when the query
/// produced at least one result, `Some(false)` when it produced none, and
/// `None` when the query itself failed; the indexing evaluator fails open
/// on `None`. A non-success HTTP status (bot block, captcha, rate limit)
/// is a failed query, not an empty result set.
pub struct IndexingChecker {
    client: Client,
    endpoint: String,
}

impl IndexingChecker {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.indexing_timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(IndexingChecker {
            client,
            endpoint: config.indexing_endpoint.clone(),
        })
    }

    pub async fn check(&self, url: &str) -> Option<bool> {
        match self.check_inner(url).await {
            Ok(indexed) => Some(indexed),
            Err(e) => {
                log::debug!("indexing check failed for {url}: {e}");
                None
            }
        }
    }

    async fn check_inner(&self, url: &str) -> Result<bool> {
        let response = self
            .client
            .get(self.endpoint.as_str())
            .query(&[("q", url)])
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        let result_count = body.matches("result__a").count();
        log::debug!("indexing query for {url}: {result_count} result links");

        Ok(result_count > 0)
    }
}
