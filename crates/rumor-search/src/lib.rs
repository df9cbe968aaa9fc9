//! Message search: a genetic algorithm over seed messages.
//!
//! Each candidate is a seed message. Its fitness is the number of agents a
//! propagation run reaches in a fixed topology, so the search converges on
//! messages that spread the furthest.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐  candidates   ┌──────────────┐  RunStats   ┌────────────┐
//! │ generate │ ────────────▶ │ rumor-engine │ ──────────▶ │  evaluate  │
//! └──────────┘               └──────────────┘             └────────────┘
//!       ▲                                                       │
//!       └──────────────────── evolve ◀──────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`config`]: Search settings loaded from TOML
//! - [`generate`]: Initial populations
//! - [`evaluate`]: Fitness via propagation runs, sequential or on tokio tasks
//! - [`evolve`]: Selection, crossover and mutation
//! - [`search`]: The generational loop

pub mod config;
pub mod evaluate;
pub mod evolve;
pub mod generate;
pub mod search;

pub use config::{default_config_toml, SearchConfig};
pub use evaluate::{evaluate_population, evaluate_population_concurrent, PropagationEvaluator};
pub use evolve::{crossover, mutate, reproduce, select_parents};
pub use generate::{generate_messages_with_specific_topics, generate_random_messages};
pub use search::{genetic_algorithm, genetic_algorithm_concurrent, SearchOutcome};

use rumor_engine::{EngineError, TopologyError};
use thiserror::Error;

/// Errors that can occur while searching.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid value for '{field}': {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("evaluation task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
