//! The 30 heuristic evaluators and the fixed-order vector they assemble
//! into. The order is the binding contract with the trained classifier and
//! must never change.

pub mod domain_features;
pub mod page_features;
pub mod url_features;

use crate::resources::ResourceSet;

/// Evaluator names in vector order, for logging and the CLI breakdown.
pub const FEATURE_NAMES: [&str; FeatureVector::LEN] = [
    "using_ip",
    "long_url",
    "url_shortener",
    "at_symbol",
    "double_slash_redirect",
    "hyphenated_domain",
    "subdomain_count",
    "https_scheme",
    "registration_length",
    "favicon_host",
    "non_standard_port",
    "https_in_host",
    "external_request_ratio",
    "unsafe_anchor_ratio",
    "external_script_ratio",
    "form_handler",
    "mailto_present",
    "abnormal_url",
    "redirect_chain",
    "status_bar_script",
    "right_click_disabled",
    "popup_window",
    "iframe_embed",
    "domain_age",
    "dns_record",
    "website_traffic",
    "page_rank",
    "search_index",
    "inbound_links",
    "host_resolvable",
];

/// Exactly 30 ternary scores in the documented order. Immutable once
/// assembled; the fixed length makes the assembly invariant structural.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureVector([i8; FeatureVector::LEN]);

impl FeatureVector {
    pub const LEN: usize = 30;

    pub fn values(&self) -> &[i8; FeatureVector::LEN] {
        &self.0
    }

    pub fn len(&self) -> usize {
        Self::LEN
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// The vector as the classifier's numeric input.
    pub fn model_input(&self) -> Vec<f64> {
        self.0.iter().map(|&v| v as f64).collect()
    }
}

/// Run all 30 evaluators against an already-fetched resource set. Pure and
/// deterministic over its input; evaluator faults are absorbed inside the
/// individual evaluators, so assembly itself cannot fail.
pub fn extract(resources: &ResourceSet) -> FeatureVector {
    use domain_features::*;
    use page_features::*;
    use url_features::*;

    FeatureVector([
        using_ip(resources),
        long_url(resources),
        url_shortener(resources),
        at_symbol(resources),
        double_slash_redirect(resources),
        hyphenated_domain(resources),
        subdomain_count(resources),
        https_scheme(resources),
        registration_length(resources),
        favicon_host(resources),
        non_standard_port(resources),
        https_in_host(resources),
        external_request_ratio(resources),
        unsafe_anchor_ratio(resources),
        external_script_ratio(resources),
        form_handler(resources),
        mailto_present(resources),
        abnormal_url(resources),
        redirect_chain(resources),
        status_bar_script(resources),
        right_click_disabled(resources),
        popup_window(resources),
        iframe_embed(resources),
        domain_age(resources),
        dns_record(resources),
        website_traffic(resources),
        page_rank(resources),
        search_index(resources),
        inbound_links(resources),
        host_resolvable(resources),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{FetchedDocument, PageSummary};
    use crate::resources::ResourceSet;
    use crate::whois::DomainRecord;
    use chrono::NaiveDate;

    const URL: &str = "https://example.com/welcome";

    fn baseline_resources() -> ResourceSet {
        let body = r#"<html><head>
            <link rel="icon" href="https://example.com/favicon.ico">
            </head><body>
            <a href="https://example.com/a">a</a>
            <form action="https://example.com/login"></form>
            </body></html>"#;
        let mut resources = ResourceSet::offline(URL);
        resources.document = Some(FetchedDocument {
            final_url: URL.to_string(),
            redirect_count: 0,
            body: body.to_string(),
            summary: PageSummary::parse(body),
        });
        resources.domain = Some(DomainRecord {
            creation_date: NaiveDate::from_ymd_opt(2005, 6, 1),
            expiration_date: NaiveDate::from_ymd_opt(2030, 6, 1),
            raw: "Creation Date: 2005-06-01".to_string(),
        });
        resources.dns_resolves = true;
        resources.indexed = Some(true);
        resources
    }

    #[test]
    fn test_vector_shape_under_total_fetch_failure() {
        let vector = extract(&ResourceSet::offline("http://completely.unreachable.example/x"));
        assert_eq!(vector.len(), 30);
        assert!(vector.values().iter().all(|v| (-1..=1).contains(v)));
    }

    #[test]
    fn test_vector_shape_for_unparseable_url() {
        let vector = extract(&ResourceSet::offline("not even a url"));
        assert_eq!(vector.len(), 30);
        assert!(vector.values().iter().all(|v| (-1..=1).contains(v)));
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let resources = baseline_resources();
        assert_eq!(extract(&resources), extract(&resources));
    }

    #[test]
    fn test_offline_fallback_values() {
        let vector = extract(&ResourceSet::offline(URL));
        let values = vector.values();
        // Network-dependent evaluators sit at their documented fallbacks.
        assert_eq!(values[8], -1); // registration_length: no WHOIS
        assert_eq!(values[9], -1); // favicon: no page
        assert_eq!(values[12], 0); // request ratio: no page
        assert_eq!(values[16], 1); // mailto: absence of evidence is benign
        assert_eq!(values[18], -1); // redirect chain: fetch failure
        assert_eq!(values[23], -1); // domain age: no WHOIS
        assert_eq!(values[25], 0); // traffic placeholder
        assert_eq!(values[26], 0); // page-rank placeholder
        assert_eq!(values[27], 1); // indexing fails open
        assert_eq!(values[29], -1); // DNS did not resolve
    }

    #[test]
    fn test_whois_failure_only_moves_whois_dependent_features() {
        let baseline = extract(&baseline_resources());

        let mut without_whois = baseline_resources();
        without_whois.domain = None;
        let degraded = extract(&without_whois);

        // registration_length, abnormal_url, domain_age, dns_record
        let whois_dependent = [8usize, 17, 23, 24];
        for index in 0..FeatureVector::LEN {
            if whois_dependent.contains(&index) {
                continue;
            }
            assert_eq!(
                baseline.values()[index],
                degraded.values()[index],
                "feature {} ({}) changed when only WHOIS was dropped",
                index,
                FEATURE_NAMES[index]
            );
        }
        assert_eq!(degraded.values()[8], -1);
        assert_eq!(degraded.values()[23], -1);
    }

    #[test]
    fn test_document_failure_only_moves_document_dependent_features() {
        let baseline = extract(&baseline_resources());

        let mut without_document = baseline_resources();
        without_document.document = None;
        let degraded = extract(&without_document);

        // favicon through iframe plus abnormal_url and inbound_links
        let document_dependent = [9usize, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 28];
        for index in 0..FeatureVector::LEN {
            if document_dependent.contains(&index) {
                continue;
            }
            assert_eq!(
                baseline.values()[index],
                degraded.values()[index],
                "feature {} ({}) changed when only the document fetch failed",
                index,
                FEATURE_NAMES[index]
            );
        }
        assert_eq!(degraded.values()[9], -1);
        assert_eq!(degraded.values()[18], -1);
    }

    #[test]
    fn test_dns_failure_only_moves_resolvability() {
        let baseline = extract(&baseline_resources());

        let mut without_dns = baseline_resources();
        without_dns.dns_resolves = false;
        let degraded = extract(&without_dns);

        for index in 0..FeatureVector::LEN - 1 {
            assert_eq!(
                baseline.values()[index],
                degraded.values()[index],
                "feature {} ({}) changed when only DNS failed",
                index,
                FEATURE_NAMES[index]
            );
        }
        assert_eq!(baseline.values()[29], 1);
        assert_eq!(degraded.values()[29], -1);
    }

    #[test]
    fn test_indexing_failure_only_moves_search_index() {
        let baseline = extract(&baseline_resources());

        // A failed query fails open, so the vector matches the baseline.
        let mut query_error = baseline_resources();
        query_error.indexed = None;
        assert_eq!(extract(&query_error), baseline);

        // An empty result set moves only the indexing slot.
        let mut unindexed = baseline_resources();
        unindexed.indexed = Some(false);
        let degraded = extract(&unindexed);
        for index in 0..FeatureVector::LEN {
            if index == 27 {
                continue;
            }
            assert_eq!(
                baseline.values()[index],
                degraded.values()[index],
                "feature {} ({}) changed when only the indexing signal changed",
                index,
                FEATURE_NAMES[index]
            );
        }
        assert_eq!(degraded.values()[27], -1);
    }

    #[test]
    fn test_ip_host_scores_suspicious_regardless_of_fetches() {
        let vector = extract(&ResourceSet::offline("http://1.2.3.4/login"));
        assert_eq!(vector.values()[0], -1);
    }

    #[test]
    fn test_shortener_detection_in_full_vector() {
        let short = extract(&ResourceSet::offline("http://bit.ly/2kF0ja"));
        assert_eq!(short.values()[2], -1);

        let lookalike = extract(&ResourceSet::offline("http://bitly.example.com/2kF0ja"));
        assert_eq!(lookalike.values()[2], 1);
    }

    #[test]
    fn test_feature_names_match_vector_length() {
        assert_eq!(FEATURE_NAMES.len(), FeatureVector::LEN);
    }
}
