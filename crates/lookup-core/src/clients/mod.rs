//! Client modules for the search collaborator

pub mod page_extractor;
pub mod search;

pub use page_extractor::extract_address_text;
pub use search::SearchClient;
