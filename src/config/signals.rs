use serde::{Deserialize, Serialize};
use anyhow::Result;
use std::time::Duration;
use super::{ConfigError, Validate};

/// Light timer and the offsets between the steps of one axis swap.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SignalConfig {
    pub timing_ms: u64,
    pub yellow_ms: u64,
    pub all_red_ms: u64,
    pub protected_left_ms: u64,
    pub flashing_left_ms: u64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            timing_ms: 20_000,
            yellow_ms: 2_000,
            all_red_ms: 2_000,
            protected_left_ms: 5_000,
            flashing_left_ms: 1_000,
        }
    }
}

impl SignalConfig {
    pub fn timing(&self) -> Duration {
        Duration::from_millis(self.timing_ms)
    }

    /// Time from the stop intent until the other axis has a through green.
    pub fn transition_ms(&self) -> u64 {
        self.yellow_ms + self.all_red_ms + self.protected_left_ms + self.flashing_left_ms
    }
}

impl Validate for SignalConfig {
    fn validate(&self) -> Result<()> {
        let fields = [
            ("timing_ms", self.timing_ms),
            ("yellow_ms", self.yellow_ms),
            ("all_red_ms", self.all_red_ms),
            ("protected_left_ms", self.protected_left_ms),
            ("flashing_left_ms", self.flashing_left_ms),
        ];
        for (name, value) in fields {
            if value == 0 {
                return Err(ConfigError::NonPositive(name).into());
            }
        }

        let transition_ms = self.transition_ms();
        if transition_ms >= self.timing_ms {
            return Err(ConfigError::TransitionTooLong {
                transition_ms,
                timing_ms: self.timing_ms,
            }
            .into());
        }

        Ok(())
    }
}
