//! Topology Loading
//!
//! TOML description of a population: engine budgets plus one table per
//! agent. Links are directed unless `symmetric_links` is set.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use thiserror::Error;

use rumor_types::{AgentId, TopicId};

use crate::components::agent::Agent;
use crate::config::EngineConfig;
use crate::error::{ConfigurationError, EngineError};
use crate::rules::{BeliefRule, CommunicationRule, DecisionRule};

#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("failed to read topology: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse topology: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl From<ConfigurationError> for TopologyError {
    fn from(err: ConfigurationError) -> Self {
        TopologyError::Engine(err.into())
    }
}

/// One agent as written in a topology file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSpec {
    pub name: String,
    /// Topic label to opinion
    #[serde(default)]
    pub beliefs: BTreeMap<String, i32>,
    #[serde(default)]
    pub neighbors: Vec<String>,
    #[serde(default = "DecisionRule::default_rules")]
    pub decision_rules: Vec<DecisionRule>,
    #[serde(default)]
    pub belief_rules: Vec<BeliefRule>,
    #[serde(default)]
    pub communication_rule: CommunicationRule,
}

impl AgentSpec {
    fn to_agent(&self) -> Agent {
        let mut agent = Agent::new(self.name.as_str())
            .with_neighbors(self.neighbors.iter().map(String::as_str))
            .with_decision_rules(self.decision_rules.clone())
            .with_belief_rules(self.belief_rules.clone())
            .with_communication_rule(self.communication_rule.clone());
        for (topic, opinion) in &self.beliefs {
            agent.beliefs.insert(TopicId::from(topic.as_str()), *opinion);
        }
        agent
    }
}

/// A whole population with its engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopologyConfig {
    /// Mirror every listed link in the other direction
    #[serde(default)]
    pub symmetric_links: bool,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub agents: Vec<AgentSpec>,
}

impl TopologyConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TopologyError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, TopologyError> {
        let topology: TopologyConfig = toml::from_str(content)?;
        topology.engine.validate()?;
        Ok(topology)
    }

    pub fn agent_ids(&self) -> Vec<AgentId> {
        self.agents.iter().map(|a| AgentId::from(a.name.as_str())).collect()
    }

    /// Build unregistered agents. Neighbor hypotheses are created when the
    /// agents are registered with an environment.
    pub fn build_agents(&self) -> Result<Vec<Agent>, ConfigurationError> {
        let mut agents: Vec<Agent> = self.agents.iter().map(AgentSpec::to_agent).collect();

        if self.symmetric_links {
            let mut reverse: BTreeMap<AgentId, BTreeSet<AgentId>> = BTreeMap::new();
            for agent in &agents {
                for neighbor in &agent.neighbors {
                    reverse
                        .entry(neighbor.clone())
                        .or_default()
                        .insert(agent.name.clone());
                }
            }
            for agent in &mut agents {
                if let Some(incoming) = reverse.remove(&agent.name) {
                    agent.neighbors.extend(incoming);
                }
            }
            // Whatever is left points at agents that do not exist
            if let Some((missing, from)) = reverse.into_iter().next() {
                let agent = from.into_iter().next().unwrap_or_else(|| missing.clone());
                return Err(ConfigurationError::UnknownNeighbor {
                    agent,
                    neighbor: missing,
                });
            }
        }

        Ok(agents)
    }
}

/// Index agents by name, check every link and instantiate hypotheses.
///
/// Every agent gets a tracker for each of its neighbors and for each agent
/// that lists it as a neighbor, so one-way links can carry messages.
pub fn register_agents(agents: Vec<Agent>) -> Result<BTreeMap<AgentId, Agent>, ConfigurationError> {
    let mut registry = BTreeMap::new();
    for agent in agents {
        if registry.contains_key(&agent.name) {
            return Err(ConfigurationError::DuplicateAgent { agent: agent.name });
        }
        registry.insert(agent.name.clone(), agent);
    }

    let mut incoming: BTreeMap<AgentId, BTreeSet<AgentId>> = BTreeMap::new();
    for agent in registry.values() {
        for neighbor in &agent.neighbors {
            if !registry.contains_key(neighbor) {
                return Err(ConfigurationError::UnknownNeighbor {
                    agent: agent.name.clone(),
                    neighbor: neighbor.clone(),
                });
            }
            incoming
                .entry(neighbor.clone())
                .or_default()
                .insert(agent.name.clone());
        }
    }

    for agent in registry.values_mut() {
        agent.instantiate_neighbor_hypothesis();
        for sender in incoming.remove(&agent.name).unwrap_or_default() {
            agent.track_sender(sender);
        }
        agent.validate()?;
    }

    Ok(registry)
}
