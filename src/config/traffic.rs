use serde::{Deserialize, Serialize};
use anyhow::Result;
use std::time::Duration;
use super::{ConfigError, Validate};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TrafficConfig {
    /// Period of the spawn + release pass.
    pub rate_ms: u64,
    pub release_stagger_ms: u64,
    pub release_jitter_ms: u64,
    pub seed: Option<u64>,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            rate_ms: 1_000,
            release_stagger_ms: 200,
            release_jitter_ms: 100,
            seed: None,
        }
    }
}

impl TrafficConfig {
    pub fn rate(&self) -> Duration {
        Duration::from_millis(self.rate_ms)
    }
}

impl Validate for TrafficConfig {
    fn validate(&self) -> Result<()> {
        if self.rate_ms == 0 {
            return Err(ConfigError::NonPositive("rate_ms").into());
        }

        // Queued vehicles must not leave in lockstep
        if self.release_stagger_ms == 0 {
            return Err(ConfigError::NonPositive("release_stagger_ms").into());
        }

        Ok(())
    }
}
