//! Rumor propagation engine: agents, belief revision, decision rules and
//! the delivery loop that carries a seed message through a topology.

pub mod components;
pub mod config;
pub mod environment;
pub mod error;
pub mod events;
pub mod output;
pub mod rules;
pub mod setup;
pub mod systems;

pub use components::{Agent, AgentSnapshot, NeighborHypothesis};
pub use config::EngineConfig;
pub use environment::{DeliveryContext, DeliveryQueue, Environment, Router};
pub use error::{ConfigurationError, EngineError};
pub use events::EventLogger;
pub use output::{PropagationReport, Reporter, RunStats};
pub use rules::{BeliefRevision, BeliefRule, CommunicationRule, DecisionRule};
pub use setup::{TopologyConfig, TopologyError};
pub use systems::{Assessment, Deliberation};
