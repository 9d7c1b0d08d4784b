use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod signals;
pub mod traffic;

pub use signals::*;
pub use traffic::*;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SimulationConfig {
    #[serde(default)]
    pub signals: SignalConfig,
    #[serde(default)]
    pub traffic: TrafficConfig,
}

impl SimulationConfig {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        log::debug!("Loaded configuration from {}", path);
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }
}

impl Validate for SimulationConfig {
    fn validate(&self) -> Result<()> {
        self.signals.validate()?;
        self.traffic.validate()?;
        Ok(())
    }
}

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be greater than zero")]
    NonPositive(&'static str),
    #[error("light transition takes {transition_ms}ms but timing is only {timing_ms}ms")]
    TransitionTooLong { transition_ms: u64, timing_ms: u64 },
}
