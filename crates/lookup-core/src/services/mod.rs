//! Service modules for address parsing and query building

pub mod address_normalizer;
pub mod noise_filter;
pub mod query_builder;
pub mod street_extractor;

// Re-export service types
pub use address_normalizer::{AddressNormalizer, ExtractionStrategy, NormalizerMode};
pub use noise_filter::strip_noise;
pub use query_builder::{follow_up_query, primary_query};
pub use street_extractor::street_only;
