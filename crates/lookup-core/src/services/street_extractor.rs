//! Street-only extraction used to narrow follow-up search queries

use once_cell::sync::Lazy;
use regex::Regex;

/// House number, separator, then everything up to a postal code or the end
static STREET_ONLY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]+[\s,].*?)\s*,?\s*(?:\b[0-9]{5}\b|$)").expect("street regex must compile")
});

/// Return the leading "number + street name" part of an address.
///
/// Input without a leading house number is returned unchanged.
pub fn street_only(address: &str) -> String {
    let street = STREET_ONLY_REGEX
        .captures(address.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().trim_end_matches(',').trim_end());

    match street {
        Some(street) if !street.is_empty() => street.to_string(),
        _ => address.to_string(),
    }
}
