//! Agent
//!
//! An agent's beliefs, rule configuration, adjacency and its hypotheses about
//! each neighbor. The deliberation pipeline lives in
//! [`crate::systems::deliberation`].

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use rumor_types::{AgentId, Belief, Message, TopicId};

use crate::components::hypothesis::NeighborHypothesis;
use crate::error::{ConfigurationError, EngineError};
use crate::rules::{BeliefRule, CommunicationRule, DecisionRule};

/// A belief-bearing agent in a propagation topology.
///
/// `Clone` is a deep copy: the clone gets its own beliefs and its own copy
/// of the neighbor hypotheses. Runs clone pristine agents so that nothing
/// observed in one run leaks into another.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub name: AgentId,
    pub beliefs: BTreeMap<TopicId, i32>,
    /// Evaluated in order; the first rule that decides wins
    pub decision_rules: Vec<DecisionRule>,
    pub belief_rules: Vec<BeliefRule>,
    pub communication_rule: CommunicationRule,
    pub neighbors: BTreeSet<AgentId>,
    neighbor_hypotheses: BTreeMap<AgentId, NeighborHypothesis>,
}

impl Agent {
    /// Create an agent with the default decision rules, no belief rules and
    /// an always-communicate gate
    pub fn new(name: impl Into<AgentId>) -> Self {
        Self {
            name: name.into(),
            beliefs: BTreeMap::new(),
            decision_rules: DecisionRule::default_rules(),
            belief_rules: Vec::new(),
            communication_rule: CommunicationRule::default(),
            neighbors: BTreeSet::new(),
            neighbor_hypotheses: BTreeMap::new(),
        }
    }

    pub fn with_belief(mut self, topic: impl Into<TopicId>, opinion: i32) -> Self {
        self.beliefs.insert(topic.into(), opinion);
        self
    }

    pub fn with_beliefs(mut self, beliefs: impl IntoIterator<Item = Belief>) -> Self {
        for belief in beliefs {
            self.beliefs.insert(belief.topic, belief.opinion);
        }
        self
    }

    pub fn with_decision_rules(mut self, rules: Vec<DecisionRule>) -> Self {
        self.decision_rules = rules;
        self
    }

    pub fn with_belief_rules(mut self, rules: Vec<BeliefRule>) -> Self {
        self.belief_rules = rules;
        self
    }

    pub fn with_communication_rule(mut self, rule: CommunicationRule) -> Self {
        self.communication_rule = rule;
        self
    }

    pub fn with_neighbor(mut self, neighbor: impl Into<AgentId>) -> Self {
        self.neighbors.insert(neighbor.into());
        self
    }

    pub fn with_neighbors<I, A>(mut self, neighbors: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<AgentId>,
    {
        self.neighbors.extend(neighbors.into_iter().map(Into::into));
        self
    }

    /// Create an empty hypothesis tracker for every neighbor that lacks one.
    ///
    /// Called once at topology setup; existing trackers are kept.
    pub fn instantiate_neighbor_hypothesis(&mut self) {
        for neighbor in &self.neighbors {
            self.neighbor_hypotheses
                .entry(neighbor.clone())
                .or_default();
        }
    }

    /// Track an agent that links here without being linked back.
    ///
    /// Its messages update a hypothesis like any neighbor's, but it is never
    /// a forwarding target.
    pub fn track_sender(&mut self, sender: impl Into<AgentId>) {
        self.neighbor_hypotheses.entry(sender.into()).or_default();
    }

    /// Hypothesis about one neighbor
    pub fn hypothesis(&self, neighbor: &AgentId) -> Result<&NeighborHypothesis, EngineError> {
        self.neighbor_hypotheses.get(neighbor).ok_or_else(|| {
            ConfigurationError::MissingHypothesis {
                agent: self.name.clone(),
                neighbor: neighbor.clone(),
            }
            .into()
        })
    }

    /// Fold a received message into the hypothesis about its sender, then
    /// age that hypothesis by one tick. Source-less messages are ignored.
    pub fn update_neighbor_beliefs(&mut self, message: &Message) -> Result<(), EngineError> {
        let Some(sender) = message.source.as_ref() else {
            return Ok(());
        };

        let hypothesis = self.neighbor_hypotheses.get_mut(sender).ok_or_else(|| {
            EngineError::from(ConfigurationError::MissingHypothesis {
                agent: self.name.clone(),
                neighbor: sender.clone(),
            })
        })?;

        for belief in &message.beliefs {
            hypothesis.add_belief_hypothesis(belief);
        }
        hypothesis.tick();
        Ok(())
    }

    /// Check the setup invariants: at least one decision rule, usable rule
    /// thresholds and a tracker for every neighbor
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.decision_rules.is_empty() {
            return Err(ConfigurationError::NoDecisionRules {
                agent: self.name.clone(),
            });
        }
        for rule in &self.decision_rules {
            rule.validate()?;
        }
        if self.neighbors.contains(&self.name) {
            return Err(ConfigurationError::SelfLink {
                agent: self.name.clone(),
            });
        }
        for neighbor in &self.neighbors {
            if !self.neighbor_hypotheses.contains_key(neighbor) {
                return Err(ConfigurationError::MissingHypothesis {
                    agent: self.name.clone(),
                    neighbor: neighbor.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn opinion(&self, topic: &TopicId) -> Option<i32> {
        self.beliefs.get(topic).copied()
    }

    pub fn to_snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            name: self.name.clone(),
            beliefs: self
                .beliefs
                .iter()
                .map(|(topic, opinion)| Belief::new(topic.clone(), *opinion))
                .collect(),
            neighbors: self.neighbors.iter().cloned().collect(),
        }
    }
}

/// Serializable view of an agent's state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentSnapshot {
    pub name: AgentId,
    pub beliefs: Vec<Belief>,
    pub neighbors: Vec<AgentId>,
}
