//! Lexical evaluators: pure functions of the raw URL string and its parsed
//! structure. None of these touch the network resources.

use crate::resources::ResourceSet;
use std::net::IpAddr;

/// Fixed shortener list the classifier was trained against; substring match
/// on the whole URL.
pub const SHORTENERS: [&str; 5] = ["bit.ly", "goo.gl", "tinyurl.com", "ow.ly", "is.gd"];

/// Literal IP address used as host. IP present -> -1, else 1.
pub fn using_ip(resources: &ResourceSet) -> i8 {
    if let Some(parsed) = &resources.parsed {
        if parsed.host_is_ip {
            return -1;
        }
    }
    // A bare IP string that did not parse as a URL still counts.
    if resources.url.parse::<IpAddr>().is_ok() {
        -1
    } else {
        1
    }
}

/// URL character count: <54 -> 1, 54..=75 -> 0, >75 -> -1.
pub fn long_url(resources: &ResourceSet) -> i8 {
    let len = resources.url.chars().count();
    if len < 54 {
        1
    } else if len <= 75 {
        0
    } else {
        -1
    }
}

pub fn url_shortener(resources: &ResourceSet) -> i8 {
    if SHORTENERS.iter().any(|s| resources.url.contains(s)) {
        -1
    } else {
        1
    }
}

pub fn at_symbol(resources: &ResourceSet) -> i8 {
    if resources.url.contains('@') {
        -1
    } else {
        1
    }
}

/// "//" appearing past the scheme separator indicates an embedded redirect.
pub fn double_slash_redirect(resources: &ResourceSet) -> i8 {
    match resources.url.rfind("//") {
        Some(index) if index > 6 => -1,
        _ => 1,
    }
}

pub fn hyphenated_domain(resources: &ResourceSet) -> i8 {
    if resources.netloc().contains('-') {
        -1
    } else {
        1
    }
}

/// Dot count in the netloc: 1 -> 1, 2 -> 0, anything else -> -1.
pub fn subdomain_count(resources: &ResourceSet) -> i8 {
    match resources.netloc().matches('.').count() {
        1 => 1,
        2 => 0,
        _ => -1,
    }
}

pub fn https_scheme(resources: &ResourceSet) -> i8 {
    match &resources.parsed {
        Some(parsed) if parsed.scheme == "https" => 1,
        _ => -1,
    }
}

/// Explicit port in the netloc.
pub fn non_standard_port(resources: &ResourceSet) -> i8 {
    if resources.netloc().contains(':') {
        -1
    } else {
        1
    }
}

/// "https" as a literal inside the host, a common lure in phishing domains.
pub fn https_in_host(resources: &ResourceSet) -> i8 {
    if resources.netloc().contains("https") {
        -1
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::ResourceSet;

    fn offline(url: &str) -> ResourceSet {
        ResourceSet::offline(url)
    }

    #[test]
    fn test_using_ip_flags_literal_ip_host() {
        assert_eq!(using_ip(&offline("http://1.2.3.4/login")), -1);
        assert_eq!(using_ip(&offline("http://[::1]/login")), -1);
        assert_eq!(using_ip(&offline("https://example.com/login")), 1);
    }

    #[test]
    fn test_using_ip_on_bare_ip_string() {
        assert_eq!(using_ip(&offline("1.2.3.4")), -1);
        assert_eq!(using_ip(&offline("no-host-here")), 1);
    }

    #[test]
    fn test_long_url_boundaries() {
        assert_eq!(long_url(&offline(&"a".repeat(53))), 1);
        assert_eq!(long_url(&offline(&"a".repeat(54))), 0);
        assert_eq!(long_url(&offline(&"a".repeat(75))), 0);
        assert_eq!(long_url(&offline(&"a".repeat(76))), -1);
    }

    #[test]
    fn test_url_shortener_matches_listed_hosts_only() {
        assert_eq!(url_shortener(&offline("http://bit.ly/2kF0ja")), -1);
        assert_eq!(url_shortener(&offline("https://tinyurl.com/x")), -1);
        // Shortener-like but unlisted host
        assert_eq!(url_shortener(&offline("http://bitly.example.com/2kF0ja")), 1);
    }

    #[test]
    fn test_at_symbol() {
        assert_eq!(at_symbol(&offline("http://evil.com/@user")), -1);
        assert_eq!(at_symbol(&offline("http://example.com/")), 1);
    }

    #[test]
    fn test_double_slash_redirect() {
        assert_eq!(
            double_slash_redirect(&offline("http://example.com//evil.com")),
            -1
        );
        // Only the scheme separator
        assert_eq!(double_slash_redirect(&offline("http://a.com")), 1);
        assert_eq!(double_slash_redirect(&offline("a.com")), 1);
    }

    #[test]
    fn test_hyphenated_domain() {
        assert_eq!(hyphenated_domain(&offline("http://pay-pal.example.com/")), -1);
        assert_eq!(hyphenated_domain(&offline("http://paypal.example.com/")), 1);
    }

    #[test]
    fn test_subdomain_count() {
        assert_eq!(subdomain_count(&offline("http://example.com/")), 1);
        assert_eq!(subdomain_count(&offline("http://www.example.com/")), 0);
        assert_eq!(subdomain_count(&offline("http://a.b.example.com/")), -1);
        // Unparseable URL has an empty netloc and zero dots
        assert_eq!(subdomain_count(&offline("junk")), -1);
    }

    #[test]
    fn test_https_scheme() {
        assert_eq!(https_scheme(&offline("https://example.com/")), 1);
        assert_eq!(https_scheme(&offline("http://example.com/")), -1);
        assert_eq!(https_scheme(&offline("junk")), -1);
    }

    #[test]
    fn test_non_standard_port() {
        assert_eq!(non_standard_port(&offline("http://example.com:8080/")), -1);
        assert_eq!(non_standard_port(&offline("http://example.com/")), 1);
    }

    #[test]
    fn test_https_in_host() {
        assert_eq!(https_in_host(&offline("http://https-secure.example.com/")), -1);
        assert_eq!(https_in_host(&offline("https://example.com/")), 1);
    }
}
