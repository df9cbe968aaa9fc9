//! Configuration loading for the message search.
//!
//! All search settings are loaded from a TOML configuration file; every
//! field falls back to its default.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::SearchError;

/// Configuration constants
pub mod defaults {
    pub const POPULATION_SIZE: usize = 20;
    pub const NUM_PARENTS: usize = 5;
    pub const GENERATIONS: usize = 10;
    pub const MUTATION_RATE: f64 = 0.1;
    pub const TOPICS_PER_MESSAGE: usize = 5;
    /// Beliefs kept in a crossover child
    pub const MAX_CHILD_BELIEFS: usize = 3;
    pub const INITIAL_STRENGTH: i32 = 5;
    pub const SEED: u64 = 7;
}

/// Genetic search settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Candidates per generation
    pub population_size: usize,
    /// Best candidates kept as parents for the next generation
    pub num_parents: usize,
    pub generations: usize,
    /// Per-belief mutation probability
    pub mutation_rate: f64,
    /// Beliefs in each message of the initial population
    pub topics_per_message: usize,
    pub max_child_beliefs: usize,
    /// Strength of generated and crossover messages
    pub initial_strength: i32,
    /// Agents each candidate is seeded into; empty means every agent
    pub initial_agents: Vec<String>,
    /// Seed for the search RNG (independent of the engine seed)
    pub seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            population_size: defaults::POPULATION_SIZE,
            num_parents: defaults::NUM_PARENTS,
            generations: defaults::GENERATIONS,
            mutation_rate: defaults::MUTATION_RATE,
            topics_per_message: defaults::TOPICS_PER_MESSAGE,
            max_child_beliefs: defaults::MAX_CHILD_BELIEFS,
            initial_strength: defaults::INITIAL_STRENGTH,
            initial_agents: Vec::new(),
            seed: defaults::SEED,
        }
    }
}

impl SearchConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, SearchError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, SearchError> {
        let config: SearchConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration as a TOML string.
    pub fn to_toml(&self) -> Result<String, SearchError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), SearchError> {
        if self.population_size == 0 {
            return Err(invalid("population_size", "must be at least 1"));
        }
        if self.num_parents == 0 || self.num_parents > self.population_size {
            return Err(invalid(
                "num_parents",
                format!("must be between 1 and population_size ({})", self.population_size),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(invalid("mutation_rate", "must lie in [0, 1]"));
        }
        if self.topics_per_message == 0 {
            return Err(invalid("topics_per_message", "must be at least 1"));
        }
        if self.max_child_beliefs == 0 {
            return Err(invalid("max_child_beliefs", "must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> SearchError {
    SearchError::InvalidConfig {
        field,
        reason: reason.into(),
    }
}

/// Returns the default configuration as a TOML string.
pub fn default_config_toml() -> String {
    SearchConfig::default()
        .to_toml()
        .unwrap_or_else(|_| String::new())
}
