use crate::config::FetchConfig;
use anyhow::anyhow;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use url::Url;

/// A fetched HTML document plus the response metadata the evaluators need.
/// Absent entirely when the fetch failed or timed out.
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    pub final_url: String,
    pub redirect_count: usize,
    pub body: String,
    pub summary: PageSummary,
}

/// Tag attributes extracted once per fetch so evaluators never re-parse HTML.
#[derive(Debug, Clone, Default)]
pub struct PageSummary {
    pub link_hrefs: Vec<String>,
    pub script_srcs: Vec<String>,
    pub media_srcs: Vec<String>,
    pub anchor_hrefs: Vec<String>,
    pub form_actions: Vec<String>,
}

impl PageSummary {
    pub fn parse(body: &str) -> Self {
        let document = Html::parse_document(body);
        let collect = |selectors: &str, attr: &str| -> Vec<String> {
            match Selector::parse(selectors) {
                Ok(selector) => document
                    .select(&selector)
                    .filter_map(|el| el.value().attr(attr))
                    .map(str::to_string)
                    .collect(),
                Err(_) => Vec::new(),
            }
        };

        PageSummary {
            link_hrefs: collect("link[href]", "href"),
            script_srcs: collect("script[src]", "src"),
            media_srcs: collect("img[src], audio[src], embed[src], iframe[src]", "src"),
            anchor_hrefs: collect("a[href]", "href"),
            form_actions: collect("form[action]", "action"),
        }
    }
}

pub struct PageFetcher {
    client: Client,
    timeout: Duration,
    max_redirects: usize,
}

impl PageFetcher {
    pub fn new(config: &FetchConfig) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(config.page_timeout_seconds);
        // Redirects are followed by hand so the chain length is observable.
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(PageFetcher {
            client,
            timeout,
            max_redirects: 10,
        })
    }

    /// Fetch a URL, following redirects manually. The timeout bounds the
    /// whole fetch including every redirect hop, not each hop separately.
    /// Any failure is absorbed into `None`; it must never abort the sibling
    /// fetchers.
    pub async fn fetch(&self, url: &str) -> Option<FetchedDocument> {
        match tokio::time::timeout(self.timeout, self.fetch_inner(url)).await {
            Ok(Ok(document)) => Some(document),
            Ok(Err(e)) => {
                log::debug!("page fetch failed for {url}: {e}");
                None
            }
            Err(_) => {
                log::debug!("page fetch timed out for {url}");
                None
            }
        }
    }

    async fn fetch_inner(&self, url: &str) -> anyhow::Result<FetchedDocument> {
        let mut current_url = url.to_string();
        let mut redirect_count = 0;

        loop {
            let response = self.client.get(&current_url).send().await?;

            if response.status().is_redirection() && redirect_count < self.max_redirects {
                let location = response
                    .headers()
                    .get("location")
                    .ok_or_else(|| anyhow!("redirect response without location header"))?;
                let location_str = location.to_str()?;

                // Handle relative redirect targets
                current_url = if location_str.starts_with("http") {
                    location_str.to_string()
                } else {
                    let base = Url::parse(&current_url)?;
                    base.join(location_str)?.to_string()
                };

                redirect_count += 1;
                continue;
            }

            let body = response.text().await?;
            let summary = PageSummary::parse(&body);
            log::debug!(
                "fetched {url}: {} bytes after {redirect_count} redirects",
                body.len()
            );

            return Ok(FetchedDocument {
                final_url: current_url,
                redirect_count,
                body,
                summary,
            });
        }
    }
}
