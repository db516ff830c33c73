//! Candidate prefix construction.

use bazaar_shared::ListingId;

/// Append a trailing `/` unless the prefix is empty or already has one.
#[must_use]
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_start_matches('/');
    if trimmed.is_empty() || trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    }
}

/// Every historical layout a listing's images may live under.
#[must_use]
pub fn layout_prefixes(listing: ListingId) -> [String; 4] {
    [
        format!("{listing}/"),
        format!("vehicles/{listing}/"),
        format!("vehicle/{listing}/"),
        format!("registration/{listing}/"),
    ]
}

/// Candidate prefixes for a listing: registry hints first, then the fixed
/// layouts. Blank hints are dropped; the result is normalised and deduplicated
/// in first-seen order.
#[must_use]
pub fn candidate_prefixes(listing: ListingId, registry_prefixes: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let hints = registry_prefixes
        .iter()
        .map(|p| normalize_prefix(p))
        .filter(|p| !p.is_empty());

    for prefix in hints.chain(layout_prefixes(listing)) {
        if !out.contains(&prefix) {
            out.push(prefix);
        }
    }
    out
}
