//! Search engine client supplying raw address text for a query

use super::page_extractor::extract_address_text;
use crate::config::SearchConfig;
use crate::error::{LookupError, Result};
use crate::pipeline::AddressSource;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::Client as HttpClient;
use std::time::Duration;

pub struct SearchClient {
    config: SearchConfig,
    http_client: HttpClient,
}

impl SearchClient {
    pub fn new(config: SearchConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let language = HeaderValue::from_str(&config.accept_language)
            .map_err(|e| LookupError::Config(format!("Invalid accept_language: {}", e)))?;
        headers.insert(ACCEPT_LANGUAGE, language);

        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Fetch the results page HTML for a query
    pub async fn fetch_page(&self, query: &str) -> Result<String> {
        let response = self
            .http_client
            .get(&self.config.base_url)
            .query(&[("q", query)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LookupError::ServiceUnavailable(format!(
                "Search returned {} for '{}'",
                response.status(),
                query
            )));
        }

        Ok(response.text().await?)
    }

    /// Fetch with bounded retries and linear backoff
    async fn fetch_page_with_retry(&self, query: &str) -> Result<String> {
        let attempts = self.config.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=attempts {
            match self.fetch_page(query).await {
                Ok(html) => return Ok(html),
                Err(e) => {
                    log::warn!("Search attempt {}/{} failed for '{}': {}", attempt, attempts, query, e);
                    last_error = Some(e);
                    if attempt < attempts {
                        tokio::time::sleep(self.backoff_after(attempt)).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            LookupError::ServiceUnavailable(format!("No search attempt made for '{}'", query))
        }))
    }

    /// Pause after failed attempt `attempt`; grows linearly and saturates
    fn backoff_after(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.config.retry_backoff_ms.saturating_mul(u64::from(attempt)))
    }
}

#[async_trait]
impl AddressSource for SearchClient {
    async fn fetch_raw_address(&self, query: &str) -> Result<String> {
        let html = self.fetch_page_with_retry(query).await?;
        let raw = extract_address_text(&html);

        if raw.is_empty() {
            log::info!("No address candidate on results page for '{}'", query);
        } else {
            log::info!("Raw address found: '{}'", raw);
        }
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_accept_language() {
        let config = SearchConfig {
            accept_language: "fr\nFR".to_string(),
            ..Default::default()
        };
        assert!(matches!(SearchClient::new(config), Err(LookupError::Config(_))));
    }

    #[test]
    fn test_backoff_grows_linearly_and_saturates() {
        let client = SearchClient::new(SearchConfig {
            retry_backoff_ms: 1500,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.backoff_after(1), Duration::from_millis(1500));
        assert_eq!(client.backoff_after(3), Duration::from_millis(4500));

        let client = SearchClient::new(SearchConfig {
            retry_backoff_ms: u64::MAX,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.backoff_after(2), Duration::from_millis(u64::MAX));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_fails_after_retries() {
        let config = SearchConfig {
            base_url: "http://127.0.0.1:9/search".to_string(),
            timeout_secs: 2,
            max_attempts: 2,
            retry_backoff_ms: 0,
            ..Default::default()
        };
        let client = SearchClient::new(config).unwrap();

        let result = client.fetch_raw_address("Boulangerie Martin Lille").await;
        assert!(matches!(result, Err(LookupError::Http(_))));
    }
}
