//! Address Lookup Core Library
//!
//! Normalizes noisy search-result text into French postal addresses and
//! drives the lookup of missing addresses for a table of establishments.

pub mod config;
pub mod constants;
pub mod clients;
pub mod services;
pub mod pipeline;
pub mod records;
pub mod error;

// Re-export main types for easy access
pub use config::LookupConfig;
pub use error::{LookupError, Result};

pub use lookup_types::{EstablishmentRecord, LookupRun, LookupStatus, ParsedAddress, RecordOutcome};

pub use clients::{extract_address_text, SearchClient};

pub use services::{
    AddressNormalizer,
    ExtractionStrategy,
    NormalizerMode,
    street_only,
    strip_noise,
};

pub use pipeline::{AddressSource, DelayPolicy, LookupOrchestrator, ProcessedRecords};

pub use records::{EstablishmentTable, RecordStore};

/// Normalize raw text with the default (advanced) normalizer
pub fn normalize(raw: &str) -> ParsedAddress {
    AddressNormalizer::default().normalize(raw)
}
