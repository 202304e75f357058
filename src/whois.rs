use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use regex::Regex;
use std::collections::HashMap;
use std::time::Duration;

/// WHOIS registration record for a domain. Either date may be missing when
/// the registry response is absent or unparseable; `raw` keeps the full
/// response text for the abnormal-URL comparison.
#[derive(Debug, Clone)]
pub struct DomainRecord {
    pub creation_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
    pub raw: String,
}

const CREATION_PATTERNS: &[&str] = &[
    r"(?i)creation\s*date[:\s]+([^\r\n]+)",
    r"(?i)created[:\s]+([^\r\n]+)",
    r"(?i)registered\s*on[:\s]+([^\r\n]+)",
    r"(?i)registered[:\s]+([^\r\n]+)",
    r"(?i)registration\s*date[:\s]+([^\r\n]+)",
    r"(?i)domain\s*created[:\s]+([^\r\n]+)",
    r"(?i)created\s*on[:\s]+([^\r\n]+)",
    r"(?i)create_date[:\s]+([^\r\n]+)",
];

const EXPIRATION_PATTERNS: &[&str] = &[
    r"(?i)registry\s*expiry\s*date[:\s]+([^\r\n]+)",
    r"(?i)expiration\s*date[:\s]+([^\r\n]+)",
    r"(?i)expiry\s*date[:\s]+([^\r\n]+)",
    r"(?i)expires\s*on[:\s]+([^\r\n]+)",
    r"(?i)expires[:\s]+([^\r\n]+)",
    r"(?i)paid-till[:\s]+([^\r\n]+)",
];

pub struct WhoisClient {
    timeout: Duration,
}

impl WhoisClient {
    pub fn new(timeout_seconds: u64) -> Self {
        WhoisClient {
            timeout: Duration::from_secs(timeout_seconds),
        }
    }

    /// Look up the registration record for a host. All failures (connect,
    /// timeout, empty or unparseable response) collapse into `None`.
    pub async fn lookup(&self, host: &str) -> Option<DomainRecord> {
        match self.lookup_inner(host).await {
            Ok(record) => Some(record),
            Err(e) => {
                log::debug!("whois lookup failed for {host}: {e}");
                None
            }
        }
    }

    async fn lookup_inner(&self, host: &str) -> Result<DomainRecord> {
        let root_domain = extract_root_domain(host);

        // Basic validation to prevent invalid WHOIS queries
        if root_domain.is_empty()
            || root_domain.contains(' ')
            || root_domain.contains(',')
            || root_domain.contains(';')
            || !root_domain.contains('.')
        {
            return Err(anyhow!("invalid domain format: {root_domain}"));
        }

        let server = whois_server_for(&root_domain);
        log::debug!("using WHOIS server {server} for {root_domain}");

        let text = match self.query_server(server, &root_domain).await {
            Ok(text) => text,
            Err(e) => {
                log::debug!("WHOIS query via {server} failed: {e}");
                self.query_fallback_servers(&root_domain).await?
            }
        };

        Ok(parse_record(&text))
    }

    /// Query a WHOIS server directly on TCP port 43.
    async fn query_server(&self, server: &str, domain: &str) -> Result<String> {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpStream;
        use tokio::time::timeout;

        let mut stream =
            timeout(self.timeout, TcpStream::connect(format!("{server}:43"))).await??;

        let query = format!("{domain}\r\n");
        stream.write_all(query.as_bytes()).await?;

        let mut response = String::new();
        timeout(self.timeout, stream.read_to_string(&mut response)).await??;

        if response.is_empty() {
            return Err(anyhow!("empty WHOIS response"));
        }

        Ok(response)
    }

    async fn query_fallback_servers(&self, domain: &str) -> Result<String> {
        for server in ["whois.iana.org", "whois.internic.net"] {
            log::debug!("trying fallback WHOIS server {server}");
            match self.query_server(server, domain).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    log::debug!("fallback server {server} failed: {e}");
                    continue;
                }
            }
        }
        Err(anyhow!("all WHOIS servers failed for {domain}"))
    }
}

/// Extract the registrable root domain for WHOIS queries,
/// e.g. "login.example.co.uk" -> "example.co.uk".
pub fn extract_root_domain(host: &str) -> String {
    let parts: Vec<&str> = host.split('.').collect();
    if parts.len() < 2 {
        return host.to_string();
    }

    let root = format!("{}.{}", parts[parts.len() - 2], parts[parts.len() - 1]);

    if parts.len() >= 3 {
        let two_part_tlds = [
            "co.uk", "com.au", "co.jp", "co.kr", "com.br", "co.za", "com.mx", "co.in", "com.sg",
            "co.nz", "org.uk", "net.au", "gov.uk", "ac.uk",
        ];
        if two_part_tlds.contains(&root.as_str()) {
            return format!(
                "{}.{}.{}",
                parts[parts.len() - 3],
                parts[parts.len() - 2],
                parts[parts.len() - 1]
            );
        }
    }

    root
}

fn whois_server_for(domain: &str) -> &'static str {
    let tld = domain.split('.').next_back().unwrap_or(domain);

    let servers = HashMap::from([
        ("com", "whois.verisign-grs.com"),
        ("net", "whois.verisign-grs.com"),
        ("org", "whois.pir.org"),
        ("info", "whois.afilias.net"),
        ("us", "whois.nic.us"),
        ("uk", "whois.nic.uk"),
        ("de", "whois.denic.de"),
        ("fr", "whois.afnic.fr"),
        ("nl", "whois.domain-registry.nl"),
        ("au", "whois.auda.org.au"),
        ("ca", "whois.cira.ca"),
        ("jp", "whois.jprs.jp"),
        ("cn", "whois.cnnic.cn"),
        ("ru", "whois.tcinet.ru"),
        ("br", "whois.registro.br"),
        ("tk", "whois.dot.tk"),
        ("ml", "whois.dot.ml"),
        ("ga", "whois.dot.ga"),
        ("cf", "whois.dot.cf"),
    ]);

    servers.get(tld).copied().unwrap_or("whois.iana.org")
}

/// Parse creation/expiration dates out of a raw WHOIS response. Registries
/// that list a date field more than once are resolved to the first match.
pub fn parse_record(text: &str) -> DomainRecord {
    DomainRecord {
        creation_date: find_date(text, CREATION_PATTERNS),
        expiration_date: find_date(text, EXPIRATION_PATTERNS),
        raw: text.to_string(),
    }
}

fn find_date(text: &str, patterns: &[&str]) -> Option<NaiveDate> {
    for pattern in patterns {
        if let Ok(regex) = Regex::new(pattern) {
            if let Some(captures) = regex.captures(text) {
                if let Some(date_match) = captures.get(1) {
                    let date_str = date_match.as_str().trim();
                    if let Some(date) = parse_date(date_str) {
                        return Some(date);
                    }
                    log::debug!("could not parse date format: '{date_str}'");
                }
            }
        }
    }
    None
}

fn parse_date(date_str: &str) -> Option<NaiveDate> {
    // ISO-style dates, with or without a time suffix
    if let Ok(iso) = Regex::new(r"(\d{4})-(\d{2})-(\d{2})") {
        if let Some(captures) = iso.captures(date_str) {
            let year = captures[1].parse().ok()?;
            let month = captures[2].parse().ok()?;
            let day = captures[3].parse().ok()?;
            return NaiveDate::from_ymd_opt(year, month, day);
        }
    }

    // Legacy registry formats like "03-mar-2001"
    for format in ["%d-%b-%Y", "%d.%m.%Y", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(&date_str.to_lowercase(), format) {
            return Some(date);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_root_domain() {
        assert_eq!(extract_root_domain("example.com"), "example.com");
        assert_eq!(extract_root_domain("login.example.com"), "example.com");
        assert_eq!(extract_root_domain("a.b.example.org"), "example.org");
        assert_eq!(extract_root_domain("mail.example.co.uk"), "example.co.uk");
        assert_eq!(extract_root_domain("single"), "single");
    }

    #[test]
    fn test_parse_record_iso_dates() {
        let text = "Domain Name: EXAMPLE.COM\n\
                    Creation Date: 1995-08-14T04:00:00Z\n\
                    Registry Expiry Date: 2026-08-13T04:00:00Z\n";
        let record = parse_record(text);
        assert_eq!(
            record.creation_date,
            NaiveDate::from_ymd_opt(1995, 8, 14)
        );
        assert_eq!(
            record.expiration_date,
            NaiveDate::from_ymd_opt(2026, 8, 13)
        );
        assert_eq!(record.raw, text);
    }

    #[test]
    fn test_parse_record_takes_first_of_repeated_dates() {
        let text = "Creation Date: 2001-03-03\nCreation Date: 2005-01-01\n";
        let record = parse_record(text);
        assert_eq!(record.creation_date, NaiveDate::from_ymd_opt(2001, 3, 3));
    }

    #[test]
    fn test_parse_record_legacy_format() {
        let record = parse_record("created: 03-mar-2001\nexpires: 03-mar-2030\n");
        assert_eq!(record.creation_date, NaiveDate::from_ymd_opt(2001, 3, 3));
        assert_eq!(record.expiration_date, NaiveDate::from_ymd_opt(2030, 3, 3));
    }

    #[test]
    fn test_parse_record_without_dates() {
        let record = parse_record("No match for domain \"NOSUCH.EXAMPLE\"\n");
        assert!(record.creation_date.is_none());
        assert!(record.expiration_date.is_none());
    }

    #[test]
    fn test_whois_server_selection() {
        assert_eq!(whois_server_for("example.com"), "whois.verisign-grs.com");
        assert_eq!(whois_server_for("example.org"), "whois.pir.org");
        assert_eq!(whois_server_for("example.zz"), "whois.iana.org");
    }
}
