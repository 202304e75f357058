//! Evaluators over the WHOIS record, the DNS signal, and the search-engine
//! indexing signal. A missing registration record reads as suspicious; a
//! failed indexing query fails open.

use crate::resources::ResourceSet;
use chrono::{Datelike, NaiveDate, Utc};

fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    (to.year() - from.year()) * 12 + (to.month() as i32 - from.month() as i32)
}

/// Registration window from creation to expiration: >=12 calendar months is
/// benign. Missing record or missing dates -> -1.
pub fn registration_length(resources: &ResourceSet) -> i8 {
    let Some(record) = &resources.domain else {
        return -1;
    };
    match (record.creation_date, record.expiration_date) {
        (Some(created), Some(expires)) if months_between(created, expires) >= 12 => 1,
        _ => -1,
    }
}

/// Degenerate heuristic kept for compatibility with the trained model: the
/// page body equal to the raw WHOIS dump scores benign, anything else -1.
pub fn abnormal_url(resources: &ResourceSet) -> i8 {
    match (&resources.document, &resources.domain) {
        (Some(document), Some(record)) if document.body == record.raw => 1,
        _ => -1,
    }
}

/// Domain age against today's date; split out for testability.
pub fn domain_age_at(resources: &ResourceSet, today: NaiveDate) -> i8 {
    let Some(record) = &resources.domain else {
        return -1;
    };
    match record.creation_date {
        Some(created) if months_between(created, today) >= 6 => 1,
        _ => -1,
    }
}

/// Domains younger than six calendar months are suspicious.
pub fn domain_age(resources: &ResourceSet) -> i8 {
    domain_age_at(resources, Utc::now().date_naive())
}

/// DNS record presence delegates to the domain-age result, matching the
/// trained feature semantics.
pub fn dns_record(resources: &ResourceSet) -> i8 {
    domain_age(resources)
}

/// Traffic-rank lookup is not wired up; the slot stays neutral so the
/// vector shape is preserved.
pub fn website_traffic(_resources: &ResourceSet) -> i8 {
    0
}

/// Page-rank signal, same intentional placeholder as `website_traffic`.
pub fn page_rank(_resources: &ResourceSet) -> i8 {
    0
}

/// Search-engine indexing: an empty result set is suspicious; a failed
/// query counts as indexed.
pub fn search_index(resources: &ResourceSet) -> i8 {
    match resources.indexed {
        Some(false) => -1,
        _ => 1,
    }
}

pub fn host_resolvable(resources: &ResourceSet) -> i8 {
    if resources.dns_resolves {
        1
    } else {
        -1
    }
}
