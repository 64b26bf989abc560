//! Randomized pause between network-bound lookups

use crate::config::PacingConfig;
use rand::Rng;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayPolicy {
    min_ms: u64,
    max_ms: u64,
}

impl DelayPolicy {
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self {
            min_ms: min_ms.min(max_ms),
            max_ms: min_ms.max(max_ms),
        }
    }

    /// No pause at all; used for tests and dry runs
    pub fn none() -> Self {
        Self::new(0, 0)
    }

    pub fn from_config(config: &PacingConfig) -> Self {
        Self::new(config.min_delay_ms, config.max_delay_ms)
    }

    /// Uniformly drawn from `[min_ms, max_ms]`
    pub fn next_delay(&self) -> Duration {
        if self.min_ms == self.max_ms {
            return Duration::from_millis(self.min_ms);
        }
        Duration::from_millis(rand::thread_rng().gen_range(self.min_ms..=self.max_ms))
    }

    pub async fn wait(&self) {
        let delay = self.next_delay();
        if delay.is_zero() {
            return;
        }
        log::info!("⏳ Pausing {:.1} seconds...", delay.as_secs_f64());
        tokio::time::sleep(delay).await;
    }
}

impl Default for DelayPolicy {
    fn default() -> Self {
        Self::from_config(&PacingConfig::default())
    }
}
