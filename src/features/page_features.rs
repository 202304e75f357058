//! Evaluators over the fetched document. Each one falls back to its
//! documented default when the fetch failed; a missing page never aborts the
//! assembler.

use crate::resources::ResourceSet;
use regex::Regex;

fn ratio(part: usize, total: usize) -> f64 {
    part as f64 / total as f64 * 100.0
}

fn matches_pattern(resources: &ResourceSet, pattern: &str) -> bool {
    match &resources.document {
        Some(document) => Regex::new(pattern)
            .map(|re| re.is_match(&document.body))
            .unwrap_or(false),
        None => false,
    }
}

/// Any `<link href>` mentioning the site's own netloc, read as a favicon
/// served from the same host. Match -> 1, no match or no page -> -1.
pub fn favicon_host(resources: &ResourceSet) -> i8 {
    let Some(document) = &resources.document else {
        return -1;
    };
    let netloc = resources.netloc();
    if document
        .summary
        .link_hrefs
        .iter()
        .any(|href| href.contains(netloc))
    {
        1
    } else {
        -1
    }
}

/// Fraction of `<img/audio/embed/iframe src>` values pointing at the page's
/// own URL, its netloc, or a single-dot relative path. Below 22% own-content
/// is benign, 22-61% neutral, above suspicious. No such tags -> 0.
pub fn external_request_ratio(resources: &ResourceSet) -> i8 {
    let Some(document) = &resources.document else {
        return 0;
    };
    let netloc = resources.netloc();
    let total = document.summary.media_srcs.len();
    if total == 0 {
        return 0;
    }

    let own = document
        .summary
        .media_srcs
        .iter()
        .filter(|src| {
            src.contains(&resources.url)
                || src.contains(netloc)
                || src.matches('.').count() == 1
        })
        .count();

    let percentage = ratio(own, total);
    if percentage < 22.0 {
        1
    } else if percentage < 61.0 {
        0
    } else {
        -1
    }
}

/// Fraction of anchors that are dead ("#"), scripted, mailto, or off-domain.
/// No anchors or no page -> -1.
pub fn unsafe_anchor_ratio(resources: &ResourceSet) -> i8 {
    let Some(document) = &resources.document else {
        return -1;
    };
    let netloc = resources.netloc();
    let total = document.summary.anchor_hrefs.len();
    if total == 0 {
        return -1;
    }

    let unsafe_count = document
        .summary
        .anchor_hrefs
        .iter()
        .filter(|href| {
            let href = href.to_lowercase();
            href.contains('#')
                || href.contains("javascript")
                || href.contains("mailto")
                || !(href.contains(&resources.url) || href.contains(netloc))
        })
        .count();

    let percentage = ratio(unsafe_count, total);
    if percentage < 31.0 {
        1
    } else if percentage < 67.0 {
        0
    } else {
        -1
    }
}

/// Fraction of `<link href>` / `<script src>` values pointing off-domain.
/// None of either tag -> 0, no page -> 0.
pub fn external_script_ratio(resources: &ResourceSet) -> i8 {
    let Some(document) = &resources.document else {
        return 0;
    };
    let netloc = resources.netloc();
    let refs: Vec<&String> = document
        .summary
        .link_hrefs
        .iter()
        .chain(document.summary.script_srcs.iter())
        .collect();
    if refs.is_empty() {
        return 0;
    }

    let off_domain = refs
        .iter()
        .filter(|value| !(value.contains(&resources.url) || value.contains(netloc)))
        .count();

    let percentage = ratio(off_domain, refs.len());
    if percentage < 17.0 {
        1
    } else if percentage < 81.0 {
        0
    } else {
        -1
    }
}

/// Form targets: an empty or about:blank action is phishing-grade (-1), an
/// off-domain action ambiguous (0). Same-domain-only forms or no forms at
/// all -> 1; no page -> -1. Verdict is taken from the first offending form.
pub fn form_handler(resources: &ResourceSet) -> i8 {
    let Some(document) = &resources.document else {
        return -1;
    };
    let netloc = resources.netloc();
    for action in &document.summary.form_actions {
        if action.is_empty() || action == "about:blank" {
            return -1;
        }
        if !action.contains(&resources.url) && !action.contains(netloc) {
            return 0;
        }
    }
    1
}

/// "mailto:" anywhere in the page body. Present -> -1, else (including no
/// page) -> 1.
pub fn mailto_present(resources: &ResourceSet) -> i8 {
    match &resources.document {
        Some(document) if document.body.contains("mailto:") => -1,
        _ => 1,
    }
}

/// Recorded redirect hops: <=1 -> 1, <=4 -> 0, more -> -1. Fetch failure -> -1.
pub fn redirect_chain(resources: &ResourceSet) -> i8 {
    match &resources.document {
        None => -1,
        Some(document) if document.redirect_count <= 1 => 1,
        Some(document) if document.redirect_count <= 4 => 0,
        Some(_) => -1,
    }
}

// The four checks below keep the inverted polarity the classifier was
// trained with: a pattern match scores +1, absence -1. See DESIGN.md.

pub fn status_bar_script(resources: &ResourceSet) -> i8 {
    if matches_pattern(resources, r"<script>.+onmouseover.+</script>") {
        1
    } else {
        -1
    }
}

pub fn right_click_disabled(resources: &ResourceSet) -> i8 {
    if matches_pattern(resources, r"event.button ?== ?2") {
        1
    } else {
        -1
    }
}

pub fn popup_window(resources: &ResourceSet) -> i8 {
    match &resources.document {
        Some(document) if document.body.contains("alert(") => 1,
        _ => -1,
    }
}

pub fn iframe_embed(resources: &ResourceSet) -> i8 {
    if matches_pattern(resources, r"<iframe>|<frameBorder>") {
        1
    } else {
        -1
    }
}

/// Approximate inbound-link count from raw `<a href=` occurrences:
/// 0 -> 1, <=2 -> 0, more -> -1. Fetch failure -> -1.
pub fn inbound_links(resources: &ResourceSet) -> i8 {
    let Some(document) = &resources.document else {
        return -1;
    };
    match document.body.matches("<a href=").count() {
        0 => 1,
        1 | 2 => 0,
        _ => -1,
    }
}
