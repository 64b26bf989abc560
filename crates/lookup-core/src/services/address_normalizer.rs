//! Address normalization service
//!
//! Turns noisy search-result text into a [`ParsedAddress`]. The text is first
//! cleaned by the noise filter, then handed to an ordered list of extraction
//! strategies; the first acceptable result wins.

use super::noise_filter::strip_noise;
use lookup_types::ParsedAddress;
use once_cell::sync::Lazy;
use regex::{Match, Regex};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Standalone 5-digit run
static POSTAL_CODE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[0-9]{5}\b").expect("postal code regex must compile"));

/// street fragment, optional comma, postal code, city terminated by a period or end of text
static STRICT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<street>[\p{L}0-9\s'’.,/°\-]*?)\s*,?\s*\b(?P<postal_code>[0-9]{5})\b\s+(?P<city>[\p{L}\s\-]+?)\s*(?:\.|$)",
    )
    .expect("strict address regex must compile")
});

/// Controls how aggressively the city name is shortened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizerMode {
    /// Keep the full city fragment of a strict match
    Basic,
    /// Keep only the first word of the city and fall back when it comes out empty
    #[default]
    Advanced,
}

/// One way of pulling an address out of cleaned text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// Whole-text match of `street, code city`
    Strict,
    /// Split around the first postal code found anywhere
    Permissive,
}

impl ExtractionStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            ExtractionStrategy::Strict => "strict",
            ExtractionStrategy::Permissive => "permissive",
        }
    }

    /// Run this strategy on already cleaned text
    pub fn extract(&self, text: &str, mode: NormalizerMode) -> Option<ParsedAddress> {
        match self {
            ExtractionStrategy::Strict => extract_strict(text, mode),
            ExtractionStrategy::Permissive => extract_permissive(text),
        }
    }
}

impl fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Stateless address normalizer; safe to share between threads
#[derive(Debug, Clone)]
pub struct AddressNormalizer {
    mode: NormalizerMode,
    strategies: Vec<ExtractionStrategy>,
}

impl AddressNormalizer {
    pub fn new(mode: NormalizerMode) -> Self {
        Self {
            mode,
            strategies: vec![ExtractionStrategy::Strict, ExtractionStrategy::Permissive],
        }
    }

    pub fn mode(&self) -> NormalizerMode {
        self.mode
    }

    pub fn strategies(&self) -> &[ExtractionStrategy] {
        &self.strategies
    }

    /// Parse raw text into street, postal code and city.
    ///
    /// Never fails: unparsable input yields an all-empty address and a warning
    /// in the log.
    pub fn normalize(&self, raw: &str) -> ParsedAddress {
        if raw.trim().is_empty() {
            return ParsedAddress::empty();
        }

        let cleaned = strip_noise(raw);
        let mut partial: Option<ParsedAddress> = None;

        for (position, strategy) in self.strategies.iter().enumerate() {
            match strategy.extract(&cleaned, self.mode) {
                Some(parsed) if self.accepts(&parsed) => {
                    if position > 0 {
                        log::info!("Address parsed with {} fallback: '{}'", strategy, cleaned);
                    }
                    return finalize(parsed);
                }
                Some(parsed) => {
                    log::debug!("{} strategy left the city empty for '{}'", strategy, cleaned);
                    if parsed.has_postal_code() {
                        partial.get_or_insert(parsed);
                    }
                }
                None => {
                    log::debug!("{} strategy did not match '{}'", strategy, cleaned);
                }
            }
        }

        if let Some(parsed) = partial {
            log::info!("Partial address extracted from '{}'", cleaned);
            return finalize(parsed);
        }

        log::warn!("Unable to parse address: '{}'", raw);
        ParsedAddress::empty()
    }

    fn accepts(&self, parsed: &ParsedAddress) -> bool {
        if !parsed.has_postal_code() {
            return false;
        }
        match self.mode {
            NormalizerMode::Basic => true,
            NormalizerMode::Advanced => !parsed.city.is_empty(),
        }
    }
}

impl Default for AddressNormalizer {
    fn default() -> Self {
        Self::new(NormalizerMode::default())
    }
}

/// First standalone 5-digit run in `text`
pub fn find_postal_code(text: &str) -> Option<Match<'_>> {
    POSTAL_CODE_REGEX.find(text)
}

fn extract_strict(text: &str, mode: NormalizerMode) -> Option<ParsedAddress> {
    let caps = STRICT_REGEX.captures(text)?;
    let code = caps.name("postal_code")?;

    // Only the first postal code of the text may be reported
    if find_postal_code(text).map(|m| m.start()) != Some(code.start()) {
        return None;
    }

    let street = caps.name("street").map(|m| m.as_str()).unwrap_or_default();
    let city = caps.name("city").map(|m| m.as_str()).unwrap_or_default();

    Some(ParsedAddress::new(
        clean_street(street),
        code.as_str(),
        clean_city(city, mode),
    ))
}

fn extract_permissive(text: &str) -> Option<ParsedAddress> {
    let code = find_postal_code(text)?;

    Some(ParsedAddress::new(
        clean_street(&text[..code.start()]),
        code.as_str(),
        leading_word(&text[code.end()..]),
    ))
}

fn clean_street(street: &str) -> String {
    street
        .trim()
        .trim_end_matches(|c: char| c.is_whitespace() || c == ',' || c == '-')
        .to_string()
}

fn clean_city(city: &str, mode: NormalizerMode) -> String {
    let mut city = city.trim();
    if let Some(i) = city.find('.') {
        city = &city[..i];
    }
    if let Some(i) = city.find(" - ") {
        city = &city[..i];
    }

    match mode {
        NormalizerMode::Basic => city.trim().to_string(),
        NormalizerMode::Advanced => leading_word(city),
    }
}

/// Leading run of letters and hyphens, after skipping whitespace
fn leading_word(text: &str) -> String {
    text.trim_start()
        .chars()
        .take_while(|c| c.is_alphabetic() || *c == '-')
        .collect()
}

/// The postal code must never leak into the street.
///
/// The code is the first standalone run, so a street holding it only has it
/// inside a longer digit run. Such a street is unreliable and is dropped.
fn finalize(mut parsed: ParsedAddress) -> ParsedAddress {
    if parsed.has_postal_code() && parsed.street.contains(&parsed.postal_code) {
        log::debug!("Dropping street '{}' holding postal code {}", parsed.street, parsed.postal_code);
        parsed.street.clear();
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advanced() -> AddressNormalizer {
        AddressNormalizer::new(NormalizerMode::Advanced)
    }

    #[test]
    fn test_strict_pattern_with_trailing_period() {
        let parsed = advanced().normalize("15 Avenue Victor Hugo, 69006 Lyon.");
        assert_eq!(parsed, ParsedAddress::new("15 Avenue Victor Hugo", "69006", "Lyon"));
    }

    #[test]
    fn test_phone_number_excluded_from_city() {
        let parsed = advanced().normalize("12 Rue des Lilas, 75001 Paris 01 23 45 67 89");
        assert_eq!(parsed.postal_code, "75001");
        assert_eq!(parsed.city, "Paris");
        assert_eq!(parsed.street, "12 Rue des Lilas");
    }

    #[test]
    fn test_call_to_action_suffix() {
        let parsed = advanced().normalize("Cabinet médical 44000 NANTES - Prendre RDV");
        assert_eq!(parsed, ParsedAddress::new("Cabinet médical", "44000", "NANTES"));
    }

    #[test]
    fn test_strict_rejects_and_permissive_recovers() {
        let text = "Cabinet (Dr Martin) 44000 NANTES";
        assert!(ExtractionStrategy::Strict.extract(text, NormalizerMode::Advanced).is_none());

        let parsed = advanced().normalize(text);
        assert_eq!(parsed, ParsedAddress::new("Cabinet (Dr Martin)", "44000", "NANTES"));
    }

    #[test]
    fn test_permissive_city_stops_at_non_letter() {
        let parsed = ExtractionStrategy::Permissive
            .extract("Zone Artisanale, 17000 La Rochelle", NormalizerMode::Advanced)
            .unwrap();
        assert_eq!(parsed.street, "Zone Artisanale");
        assert_eq!(parsed.city, "La");

        let parsed = ExtractionStrategy::Permissive
            .extract("2 rue Victor Hugo 76800 Saint-Étienne-du-Rouvray (France)", NormalizerMode::Advanced)
            .unwrap();
        assert_eq!(parsed.city, "Saint-Étienne-du-Rouvray");
    }

    #[test]
    fn test_basic_mode_keeps_multi_word_city() {
        let basic = AddressNormalizer::new(NormalizerMode::Basic);
        let parsed = basic.normalize("5 rue du Port, 17000 La Rochelle");
        assert_eq!(parsed.city, "La Rochelle");

        let parsed = advanced().normalize("5 rue du Port, 17000 La Rochelle");
        assert_eq!(parsed.city, "La");
    }

    #[test]
    fn test_missing_city_keeps_postal_code() {
        let parsed = advanced().normalize("12 rue des Lilas, 75001");
        assert_eq!(parsed, ParsedAddress::new("12 rue des Lilas", "75001", ""));
    }

    #[test]
    fn test_no_postal_code_yields_empty() {
        assert_eq!(advanced().normalize("Ouvert du lundi au vendredi"), ParsedAddress::empty());
        assert_eq!(advanced().normalize("Code 123456 invalide"), ParsedAddress::empty());
        assert_eq!(advanced().normalize(""), ParsedAddress::empty());
        assert_eq!(advanced().normalize("   \n "), ParsedAddress::empty());
    }

    #[test]
    fn test_first_postal_code_wins() {
        let parsed = advanced().normalize("BP 12345, 75008 Paris");
        assert_eq!(parsed.postal_code, "12345");
        assert!(!parsed.street.contains("12345"));
        assert!(!parsed.city.contains("12345"));
    }

    #[test]
    fn test_postal_code_never_leaks_into_street() {
        let parsed = advanced().normalize("Lot 175001, 75001 Paris");
        assert_eq!(parsed, ParsedAddress::new("", "75001", "Paris"));
    }

    #[test]
    fn test_label_before_address_is_dropped() {
        let parsed = advanced().normalize("Pharmacie du Centre - 3 place du Marché 33000 Bordeaux");
        assert_eq!(parsed, ParsedAddress::new("3 place du Marché", "33000", "Bordeaux"));

        let parsed = advanced().normalize("Zone Artisanale - 17000 La Rochelle");
        assert_eq!(parsed, ParsedAddress::new("Zone Artisanale", "17000", "La"));
    }

    #[test]
    fn test_marker_before_address_keeps_postal_code() {
        let parsed = advanced().normalize("Itinéraire 3 quai Fulchiron 69005 Lyon");
        assert_eq!(parsed.postal_code, "69005");
        assert_eq!(parsed.city, "Lyon");

        let parsed = advanced().normalize("Horaires : Ouvert 9h-18h 12 Rue des Lilas, 75001 Paris");
        assert_eq!(parsed.postal_code, "75001");
        assert_eq!(parsed.city, "Paris");
        assert!(parsed.street.ends_with("12 Rue des Lilas"));
    }

    #[test]
    fn test_legal_mentions_are_dropped() {
        let parsed = advanced().normalize(
            "10 Rue de la Paix, 75002 Paris Mentions légales SARL au capital de 10000 euros 92100",
        );
        assert_eq!(parsed, ParsedAddress::new("10 Rue de la Paix", "75002", "Paris"));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let normalizer = advanced();
        let input = "Pharmacie, 3 place du Marché 33000 Bordeaux - Itinéraire";
        assert_eq!(normalizer.normalize(input), normalizer.normalize(input));
    }
}
