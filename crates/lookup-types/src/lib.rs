//! Shared types for the address lookup pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Structured address produced by the normalizer.
///
/// Every field is always present; an empty string means "not extracted".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedAddress {
    pub street: String,
    pub postal_code: String,
    pub city: String,
}

impl ParsedAddress {
    pub fn new(
        street: impl Into<String>,
        postal_code: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            postal_code: postal_code.into(),
            city: city.into(),
        }
    }

    /// All-empty result, used for unparsable input
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.street.is_empty() && self.postal_code.is_empty() && self.city.is_empty()
    }

    pub fn has_postal_code(&self) -> bool {
        !self.postal_code.is_empty()
    }

    /// True when street, postal code and city were all extracted
    pub fn is_complete(&self) -> bool {
        !self.street.is_empty() && !self.postal_code.is_empty() && !self.city.is_empty()
    }
}

impl fmt::Display for ParsedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {} {}", self.street, self.postal_code, self.city)
    }
}

/// One row of the establishment table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstablishmentRecord {
    pub name: String,
    pub street: String,
    pub postal_code: String,
    pub city: String,

    /// Columns the pipeline does not interpret, keyed by header
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl EstablishmentRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_address(
        mut self,
        street: impl Into<String>,
        postal_code: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        self.street = street.into();
        self.postal_code = postal_code.into();
        self.city = city.into();
        self
    }

    /// Merge a parsed address into this record.
    ///
    /// Parsed fields only override the existing value when they are non-empty.
    pub fn merge_parsed(&self, parsed: &ParsedAddress) -> Self {
        fn pick(parsed: &str, original: &str) -> String {
            if parsed.is_empty() {
                original.to_string()
            } else {
                parsed.to_string()
            }
        }

        Self {
            name: self.name.clone(),
            street: pick(&parsed.street, &self.street),
            postal_code: pick(&parsed.postal_code, &self.postal_code),
            city: pick(&parsed.city, &self.city),
            extra: self.extra.clone(),
        }
    }
}

/// Result classification for a single establishment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LookupStatus {
    /// Street, postal code and city extracted
    Parsed,
    /// Postal code extracted, street or city missing
    Partial,
    /// Text found but no postal code in it
    Unparsed,
    /// The search returned no candidate text
    NotFound,
    /// The lookup itself failed
    Failed,
}

impl LookupStatus {
    pub fn from_parsed(parsed: &ParsedAddress) -> Self {
        if parsed.is_complete() {
            LookupStatus::Parsed
        } else if parsed.has_postal_code() {
            LookupStatus::Partial
        } else {
            LookupStatus::Unparsed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LookupStatus::Parsed => "parsed",
            LookupStatus::Partial => "partial",
            LookupStatus::Unparsed => "unparsed",
            LookupStatus::NotFound => "not_found",
            LookupStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for LookupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of processing one establishment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordOutcome {
    pub row_index: usize,
    pub name: String,
    pub query: String,
    pub status: LookupStatus,
    pub raw_text: Option<String>,
    pub parsed: Option<ParsedAddress>,
    pub error_message: Option<String>,
    pub processed_at: DateTime<Utc>,
}

/// A complete lookup run over an establishment table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupRun {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub total_records: usize,
    pub outcomes: Vec<RecordOutcome>,
}

impl LookupRun {
    pub fn new(total_records: usize) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            finished_at: None,
            total_records,
            outcomes: Vec::with_capacity(total_records),
        }
    }

    pub fn record(&mut self, outcome: RecordOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn count(&self, status: LookupStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    /// One-line summary for logs
    pub fn summary(&self) -> String {
        format!(
            "{} records: {} parsed, {} partial, {} unparsed, {} not found, {} failed",
            self.outcomes.len(),
            self.count(LookupStatus::Parsed),
            self.count(LookupStatus::Partial),
            self.count(LookupStatus::Unparsed),
            self.count(LookupStatus::NotFound),
            self.count(LookupStatus::Failed),
        )
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
