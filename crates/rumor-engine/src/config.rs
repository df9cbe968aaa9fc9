//! Engine Configuration
//!
//! Run budgets and the RNG seed. Loaded from the `[engine]` table of a
//! topology file or used with defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigurationError;
use crate::setup::TopologyError;

/// Configuration constants
pub mod defaults {
    /// Deliveries processed before a run is cut short
    pub const MAX_DELIVERIES: u64 = 10_000;
    /// Full belief-rule passes allowed before revision is declared divergent
    pub const MAX_REVISION_PASSES: usize = 64;
    /// Seed for the per-run RNG
    pub const SEED: u64 = 42;
}

/// Budgets and seed for propagation runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Upper bound on deliveries per run; cyclic topologies rely on it to end
    pub max_deliveries: u64,
    /// Upper bound on belief-rule fixpoint passes per received message
    pub max_revision_passes: usize,
    /// Every run reseeds its RNG from this value, so a run is a pure
    /// function of topology and seed message
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_deliveries: defaults::MAX_DELIVERIES,
            max_revision_passes: defaults::MAX_REVISION_PASSES,
            seed: defaults::SEED,
        }
    }
}

impl EngineConfig {
    /// Load a standalone engine config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TopologyError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, TopologyError> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_deliveries(mut self, max_deliveries: u64) -> Self {
        self.max_deliveries = max_deliveries;
        self
    }

    pub fn with_max_revision_passes(mut self, passes: usize) -> Self {
        self.max_revision_passes = passes;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.max_deliveries == 0 {
            return Err(ConfigurationError::InvalidValue {
                field: "max_deliveries",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.max_revision_passes == 0 {
            return Err(ConfigurationError::InvalidValue {
                field: "max_revision_passes",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.max_deliveries, 10_000);
        assert_eq!(config.max_revision_passes, 64);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: EngineConfig = toml::from_str("max_deliveries = 50").unwrap();
        assert_eq!(config.max_deliveries, 50);
        assert_eq!(config.max_revision_passes, defaults::MAX_REVISION_PASSES);
        assert_eq!(config.seed, defaults::SEED);
    }

    #[test]
    fn test_from_str_validates() {
        let config = EngineConfig::from_str("seed = 9\nmax_revision_passes = 8").unwrap();
        assert_eq!(config.seed, 9);
        assert_eq!(config.max_revision_passes, 8);
        assert!(EngineConfig::from_str("max_deliveries = 0").is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.toml");
        std::fs::write(&path, "max_deliveries = 12").unwrap();

        let config = EngineConfig::from_file(&path).unwrap();
        assert_eq!(config.max_deliveries, 12);
        assert!(EngineConfig::from_file(dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_zero_budgets_rejected() {
        assert!(EngineConfig::default().with_max_deliveries(0).validate().is_err());
        assert!(EngineConfig::default()
            .with_max_revision_passes(0)
            .validate()
            .is_err());
    }
}
