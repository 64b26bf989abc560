//! Lookup orchestrator: sequences searches, normalization and record merging

use super::delay::DelayPolicy;
use super::traits::AddressSource;
use crate::config::LookupConfig;
use crate::services::{follow_up_query, primary_query, AddressNormalizer};
use chrono::Utc;
use lookup_types::{EstablishmentRecord, LookupRun, LookupStatus, ParsedAddress, RecordOutcome};

/// Records after processing, in input order, with the run report
#[derive(Debug, Clone)]
pub struct ProcessedRecords {
    pub records: Vec<EstablishmentRecord>,
    pub run: LookupRun,
}

/// Text retrieved for one query and what the normalizer made of it
struct Attempt {
    query: String,
    raw: String,
    parsed: Option<ParsedAddress>,
}

impl Attempt {
    fn has_postal_code(&self) -> bool {
        self.parsed.as_ref().map(ParsedAddress::has_postal_code).unwrap_or(false)
    }
}

/// Processes establishments one at a time
pub struct LookupOrchestrator<S: AddressSource> {
    source: S,
    normalizer: AddressNormalizer,
    delay: DelayPolicy,
    follow_up: bool,
}

impl<S: AddressSource> LookupOrchestrator<S> {
    pub fn new(source: S, normalizer: AddressNormalizer, delay: DelayPolicy) -> Self {
        Self {
            source,
            normalizer,
            delay,
            follow_up: true,
        }
    }

    pub fn from_config(source: S, config: &LookupConfig) -> Self {
        Self::new(
            source,
            AddressNormalizer::new(config.normalizer.mode),
            DelayPolicy::from_config(&config.pacing),
        )
        .with_follow_up(config.normalizer.follow_up_query)
    }

    /// Enable or disable the street-only follow-up query
    pub fn with_follow_up(mut self, enabled: bool) -> Self {
        self.follow_up = enabled;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Look up every record; no record is ever dropped
    pub async fn process_records(&self, records: Vec<EstablishmentRecord>) -> ProcessedRecords {
        let total = records.len();
        let mut run = LookupRun::new(total);
        let mut processed = Vec::with_capacity(total);

        log::info!("📊 Processing {} records (run {})", total, run.run_id);

        for (index, record) in records.into_iter().enumerate() {
            log::info!("🔍 Lookup {}/{}: {}", index + 1, total, record.name);

            let (merged, outcome) = self.process_single_record(index, record).await;
            processed.push(merged);
            run.record(outcome);

            if index + 1 < total {
                self.delay.wait().await;
            }
        }

        run.finish();
        log::info!("✅ Lookup finished: {}", run.summary());

        ProcessedRecords {
            records: processed,
            run,
        }
    }

    /// Look up a single record and merge the parsed address into it
    pub async fn process_single_record(
        &self,
        index: usize,
        record: EstablishmentRecord,
    ) -> (EstablishmentRecord, RecordOutcome) {
        let primary = primary_query(&record);

        let attempt = match self.lookup(&primary).await {
            Ok(attempt) => attempt,
            Err(e) => {
                log::error!("❌ Lookup failed for {}: {}", record.name, e);
                let outcome = RecordOutcome {
                    row_index: index,
                    name: record.name.clone(),
                    query: primary,
                    status: LookupStatus::Failed,
                    raw_text: None,
                    parsed: None,
                    error_message: Some(e.to_string()),
                    processed_at: Utc::now(),
                };
                return (record, outcome);
            }
        };

        let attempt = if attempt.has_postal_code() || !self.follow_up {
            attempt
        } else {
            self.retry_with_follow_up(&record, attempt).await
        };

        let (merged, status) = match &attempt.parsed {
            Some(parsed) => {
                let status = LookupStatus::from_parsed(parsed);
                if parsed.has_postal_code() {
                    log::info!("✅ Parsed: {}", parsed);
                }
                (record.merge_parsed(parsed), status)
            }
            None => {
                log::info!("No address found for {}", record.name);
                (record.clone(), LookupStatus::NotFound)
            }
        };

        let outcome = RecordOutcome {
            row_index: index,
            name: record.name,
            query: attempt.query,
            status,
            raw_text: (!attempt.raw.is_empty()).then_some(attempt.raw),
            parsed: attempt.parsed,
            error_message: None,
            processed_at: Utc::now(),
        };

        (merged, outcome)
    }

    async fn lookup(&self, query: &str) -> crate::Result<Attempt> {
        let raw = self.source.fetch_raw_address(query).await?;
        let parsed = if raw.trim().is_empty() {
            None
        } else {
            Some(self.normalizer.normalize(&raw))
        };

        Ok(Attempt {
            query: query.to_string(),
            raw,
            parsed,
        })
    }

    /// Retry with a narrower query; the first attempt is kept unless the follow-up finds a postal code
    async fn retry_with_follow_up(&self, record: &EstablishmentRecord, first: Attempt) -> Attempt {
        let Some(query) = follow_up_query(record) else {
            return first;
        };

        self.delay.wait().await;
        log::info!("🔁 Follow-up lookup for {}: {}", record.name, query);

        match self.lookup(&query).await {
            Ok(attempt) if attempt.has_postal_code() => attempt,
            Ok(_) => first,
            Err(e) => {
                log::warn!("Follow-up lookup failed for {}: {}", record.name, e);
                first
            }
        }
    }
}
