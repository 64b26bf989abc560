//! Search query construction for establishment records

use super::street_extractor::street_only;
use lookup_types::EstablishmentRecord;

fn join_parts(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `name street city`, skipping missing parts
pub fn primary_query(record: &EstablishmentRecord) -> String {
    join_parts(&[&record.name, &record.street, &record.city])
}

/// Narrower query built from the street-only part of a known address.
///
/// Anchored on the postal code when one is known, otherwise on the city.
/// Returns `None` when the record has no street or the query would repeat
/// the primary one.
pub fn follow_up_query(record: &EstablishmentRecord) -> Option<String> {
    if record.street.trim().is_empty() {
        return None;
    }

    let street = street_only(&record.street);
    let anchor = if record.postal_code.trim().is_empty() {
        &record.city
    } else {
        &record.postal_code
    };

    let query = join_parts(&[&record.name, &street, anchor]);
    if query == primary_query(record) {
        None
    } else {
        Some(query)
    }
}
