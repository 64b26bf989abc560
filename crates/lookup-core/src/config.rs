//! Configuration management for the address lookup pipeline

use crate::constants;
use crate::error::{LookupError, Result};
use crate::services::NormalizerMode;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix for environment overrides, e.g. `ADDRESS_LOOKUP__PACING__MIN_DELAY_MS`
pub const ENV_PREFIX: &str = "ADDRESS_LOOKUP";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    pub files: FilesConfig,
    pub search: SearchConfig,
    pub pacing: PacingConfig,
    pub columns: ColumnsConfig,
    pub normalizer: NormalizerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    #[serde(alias = "input")]
    pub input_path: String,

    #[serde(alias = "output")]
    pub output_path: String,

    /// Optional JSON run report
    pub report_path: Option<String>,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            input_path: "input.csv".to_string(),
            output_path: "output.csv".to_string(),
            report_path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    #[serde(alias = "url")]
    pub base_url: String,

    pub user_agent: String,
    pub accept_language: String,
    pub timeout_secs: u64,

    /// Attempts per query, including the first one
    pub max_attempts: u32,

    /// Backoff unit between attempts; attempt `n` waits `n * retry_backoff_ms`
    pub retry_backoff_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: constants::DEFAULT_SEARCH_URL.to_string(),
            user_agent: constants::DEFAULT_USER_AGENT.to_string(),
            accept_language: "fr-FR,fr;q=0.9".to_string(),
            timeout_secs: 30,
            max_attempts: constants::DEFAULT_MAX_ATTEMPTS,
            retry_backoff_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: constants::DEFAULT_MIN_DELAY_MS,
            max_delay_ms: constants::DEFAULT_MAX_DELAY_MS,
        }
    }
}

/// Header names of the establishment table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnsConfig {
    pub name: String,
    pub street: String,
    pub postal_code: String,
    pub city: String,
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            name: "Nom établissement".to_string(),
            street: "Adresse".to_string(),
            postal_code: "Code postal".to_string(),
            city: "Ville".to_string(),
        }
    }
}

impl ColumnsConfig {
    pub fn address_columns(&self) -> [&str; 3] {
        [&self.street, &self.postal_code, &self.city]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    pub mode: NormalizerMode,

    /// Retry with a street-only query when the first lookup yields no postal code
    pub follow_up_query: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            mode: NormalizerMode::Advanced,
            follow_up_query: true,
        }
    }
}

impl LookupConfig {
    /// Load configuration from a JSON file, with environment overrides applied on top
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LookupError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let config: Self = config::Config::builder()
            .add_source(config::File::new(
                &path.to_string_lossy(),
                config::FileFormat::Json,
            ))
            .add_source(env_source())
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Built-in defaults with environment overrides applied
    pub fn from_env() -> Result<Self> {
        let config: Self = config::Config::builder()
            .add_source(env_source())
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| LookupError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.pacing.min_delay_ms > self.pacing.max_delay_ms {
            return Err(LookupError::Config(format!(
                "min_delay_ms ({}) must not exceed max_delay_ms ({})",
                self.pacing.min_delay_ms, self.pacing.max_delay_ms
            )));
        }

        if !self.search.base_url.starts_with("http://") && !self.search.base_url.starts_with("https://") {
            return Err(LookupError::Config(format!(
                "Search base_url must be an http(s) URL, got '{}'",
                self.search.base_url
            )));
        }

        if self.search.max_attempts == 0 {
            return Err(LookupError::Config("Search max_attempts is required to be at least 1".to_string()));
        }

        let columns = [
            &self.columns.name,
            &self.columns.street,
            &self.columns.postal_code,
            &self.columns.city,
        ];
        if columns.iter().any(|c| c.trim().is_empty()) {
            return Err(LookupError::Config("All column names are required".to_string()));
        }
        for (i, a) in columns.iter().enumerate() {
            if columns[i + 1..].contains(a) {
                return Err(LookupError::Config(format!("Column name '{}' is used twice", a)));
            }
        }

        Ok(())
    }
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}
