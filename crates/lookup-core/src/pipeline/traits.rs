//! Collaborator traits for the lookup pipeline

use crate::error::Result;
use async_trait::async_trait;

/// Supplies raw address text for a search query.
///
/// Implementations own networking, page rendering and text extraction.
/// An empty string means no candidate text was found.
#[async_trait]
pub trait AddressSource: Send + Sync {
    async fn fetch_raw_address(&self, query: &str) -> Result<String>;
}
