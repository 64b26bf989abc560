//! Candidate address text extraction from a rendered results page

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

static ADDRESS_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("address").expect("address selector must parse"));

/// "Adresse" label, optionally followed by the address on the same line
static LABEL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^adresse\s*:?\s*(.*)$").expect("label regex must compile"));

static POSTAL_CODE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[0-9]{5}\b").expect("postal code regex must compile"));

/// House number, street, postal code and city inside a longer snippet
static SNIPPET_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9]+[\s,]+[\p{L}0-9\s,.'’\-]*?\b[0-9]{5}\s+[\p{L}\s\-]+")
        .expect("snippet regex must compile")
});

/// Elements whose text never belongs to the visible page
const SKIPPED_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Number of text nodes after an "Adresse" label searched for the address
const LABEL_LOOKAHEAD: usize = 3;

/// Pick the most address-like text from an HTML page.
///
/// Tried in order: `<address>` elements, text following an "Adresse" label,
/// then the first text node shaped like `number street code city`.
/// Returns an empty string when nothing qualifies.
pub fn extract_address_text(html: &str) -> String {
    let document = Html::parse_document(html);

    from_address_elements(&document)
        .or_else(|| {
            let nodes = visible_text_nodes(&document);
            from_labelled_text(&nodes).or_else(|| from_snippets(&nodes))
        })
        .unwrap_or_default()
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn from_address_elements(document: &Html) -> Option<String> {
    document
        .select(&ADDRESS_SELECTOR)
        .map(|el| collapse(&el.text().collect::<Vec<_>>().join(" ")))
        .find(|text| POSTAL_CODE_REGEX.is_match(text))
}

fn visible_text_nodes(document: &Html) -> Vec<String> {
    document
        .root_element()
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node
                .parent()
                .and_then(|parent| parent.value().as_element())
                .map(|el| SKIPPED_ELEMENTS.contains(&el.name()))
                .unwrap_or(false);
            if hidden {
                return None;
            }
            let text = collapse(text);
            (!text.is_empty()).then_some(text)
        })
        .collect()
}

fn from_labelled_text(nodes: &[String]) -> Option<String> {
    for (i, node) in nodes.iter().enumerate() {
        let Some(caps) = LABEL_REGEX.captures(node) else {
            continue;
        };

        let inline = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
        if POSTAL_CODE_REGEX.is_match(inline) {
            return Some(inline.to_string());
        }

        // the address may be split over several nodes; stop at the one holding the postal code
        let mut parts = Vec::new();
        for next in nodes.iter().skip(i + 1).take(LABEL_LOOKAHEAD) {
            parts.push(next.as_str());
            if POSTAL_CODE_REGEX.is_match(next) {
                return Some(parts.join(" "));
            }
        }
    }
    None
}

fn from_snippets(nodes: &[String]) -> Option<String> {
    nodes
        .iter()
        .find_map(|node| SNIPPET_REGEX.find(node))
        .map(|m| m.as_str().trim().to_string())
}
