use crate::config::FetchConfig;
use crate::indexing::IndexingChecker;
use crate::page::{FetchedDocument, PageFetcher};
use crate::whois::{DomainRecord, WhoisClient};
use crate::dns;
use std::time::Duration;
use url::{Host, Url};

/// URL structure derived once per request and shared read-only by the
/// evaluators. `netloc` is host plus explicit port, matching the substring
/// checks the heuristics were trained against.
#[derive(Debug, Clone)]
pub struct ParsedUrl {
    pub scheme: String,
    pub host: String,
    pub netloc: String,
    pub host_is_ip: bool,
}

impl ParsedUrl {
    /// Parse a URL. Failure yields `None`, never an error.
    pub fn parse(raw: &str) -> Option<ParsedUrl> {
        let url = Url::parse(raw).ok()?;
        let host = url.host_str().unwrap_or("").to_string();
        let host_is_ip = matches!(url.host(), Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)));
        let netloc = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.clone(),
        };

        Some(ParsedUrl {
            scheme: url.scheme().to_string(),
            host,
            netloc,
            host_is_ip,
        })
    }
}

/// Everything a single classification request fetched. Each field is
/// independently absent when its fetcher failed; the evaluators fall back to
/// their documented defaults rather than aborting.
#[derive(Debug, Clone)]
pub struct ResourceSet {
    pub url: String,
    pub parsed: Option<ParsedUrl>,
    pub document: Option<FetchedDocument>,
    pub domain: Option<DomainRecord>,
    pub dns_resolves: bool,
    pub indexed: Option<bool>,
}

impl ResourceSet {
    /// Resource set with every network fetch absent. Used by offline mode
    /// and as the degenerate case when all five fetchers fail.
    pub fn offline(url: &str) -> ResourceSet {
        ResourceSet {
            url: url.to_string(),
            parsed: ParsedUrl::parse(url),
            document: None,
            domain: None,
            dns_resolves: false,
            indexed: None,
        }
    }

    /// Host plus explicit port, or empty when the URL did not parse.
    pub fn netloc(&self) -> &str {
        self.parsed.as_ref().map(|p| p.netloc.as_str()).unwrap_or("")
    }
}

/// The per-request fetcher set. Built once from config and reused across
/// requests; each request still gets its own `ResourceSet`.
pub struct Fetchers {
    pub page: PageFetcher,
    pub whois: WhoisClient,
    pub indexing: IndexingChecker,
    pub dns_timeout: Duration,
}

impl Fetchers {
    pub fn new(config: &FetchConfig) -> anyhow::Result<Self> {
        Ok(Fetchers {
            page: PageFetcher::new(config)?,
            whois: WhoisClient::new(config.whois_timeout_seconds),
            indexing: IndexingChecker::new(config)?,
            dns_timeout: Duration::from_secs(config.dns_timeout_seconds),
        })
    }
}

/// Run all fetchers for one URL. The fetches have no ordering dependency and
/// run concurrently, each bounded by its own timeout; a failed fetch leaves
/// its slot absent without disturbing the others.
pub async fn gather(url: &str, fetchers: &Fetchers) -> ResourceSet {
    let parsed = ParsedUrl::parse(url);
    let host = parsed
        .as_ref()
        .filter(|p| !p.host.is_empty())
        .map(|p| p.host.clone());

    let (document, domain, dns_resolves, indexed) = tokio::join!(
        fetchers.page.fetch(url),
        async {
            match &host {
                Some(host) => fetchers.whois.lookup(host).await,
                None => None,
            }
        },
        async {
            match &host {
                Some(host) => dns::resolves(host, fetchers.dns_timeout).await,
                None => false,
            }
        },
        fetchers.indexing.check(url),
    );

    ResourceSet {
        url: url.to_string(),
        parsed,
        document,
        domain,
        dns_resolves,
        indexed,
    }
}
