//! Noise removal applied to raw search-result text before address parsing

use super::address_normalizer::find_postal_code;
use once_cell::sync::Lazy;
use regex::Regex;

/// French phone numbers: five 2-digit groups, or `+33` followed by the national number
static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+33\s?\d|\b\d{2})(?:[ .]\d{2}){4}\b").expect("phone regex must compile")
});

/// Phrases that start non-address content; the phrase and everything after it is dropped
static BOILERPLATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    let markers = [
        // call to action
        r"prendre\s+rdv",
        r"prendre\s+rendez-vous",
        r"appeler",
        r"réserver",
        r"site\s+web",
        // legal mentions
        r"mentions\s+légales",
        r"informations\s+légales",
        r"tous\s+droits\s+réservés",
        // navigation
        r"itinéraire",
        r"voir\s+sur\s+la\s+carte",
        // accounting disclosure
        r"comptes\s+annuels",
        r"chiffre\s+d['’]affaires",
        // accessibility and opening hours
        r"horaires",
        r"accessibilité",
        r"accès\s+pmr",
    ];
    Regex::new(&format!(r"(?i)\b(?:{})", markers.join("|"))).expect("boilerplate regex must compile")
});

/// A hyphen standing on its own separates a label from the address or the address from trailing labels
static STANDALONE_HYPHEN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s-(?:\s|$)").expect("standalone hyphen regex must compile"));

static WHITESPACE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex must compile"));

/// Strip phone numbers, boilerplate and hyphen-delimited suffixes from raw text.
///
/// Only content starting after the first postal code is cut, so the postal
/// code always survives. A `Name - ` label in front of the address is dropped.
/// The result has single spaces and no leading or trailing whitespace.
pub fn strip_noise(raw: &str) -> String {
    let text = WHITESPACE_REGEX.replace_all(raw, " ");
    let mut text = PHONE_REGEX.replace_all(&text, " ").into_owned();

    if let Some(end) = leading_label_end(&text) {
        text.drain(..end);
    }

    let tail = find_postal_code(&text).map(|m| m.end()).unwrap_or(0);
    if let Some(m) = BOILERPLATE_REGEX.find_at(&text, tail) {
        text.truncate(m.start());
    }
    if let Some(m) = STANDALONE_HYPHEN_REGEX.find_at(&text, tail) {
        text.truncate(m.start());
    }

    let collapsed = WHITESPACE_REGEX.replace_all(&text, " ");
    collapsed
        .trim_matches(|c: char| c.is_whitespace() || c == ',' || c == '-')
        .to_string()
}

/// End of a `label - ` prefix closed by the last standalone hyphen before the postal code
fn leading_label_end(text: &str) -> Option<usize> {
    let code = find_postal_code(text)?;
    let hyphen = STANDALONE_HYPHEN_REGEX.find_iter(&text[..code.start()]).last()?;

    // keep the label when nothing address-like sits between it and the postal code
    text[hyphen.end()..code.start()]
        .chars()
        .any(char::is_alphanumeric)
        .then_some(hyphen.end())
}
