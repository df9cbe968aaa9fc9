//! Communication Rules
//!
//! Per-neighbor gate consulted after a decision rule produced an outgoing
//! message. The gate only ever sees the agent's hypothesis of the neighbor's
//! beliefs, never the neighbor's real state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use rumor_types::{Belief, Message, TopicId};

use crate::systems::assessment::{assess, average};

fn default_min_shared() -> usize {
    1
}

fn default_min_agreement() -> f64 {
    0.25
}

/// Built-in communication rules
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommunicationRule {
    /// Send to every candidate neighbor
    #[default]
    Always,
    /// Send to nobody
    Never,
    /// Send when the neighbor is believed to care about enough of the
    /// message's topics. Neighbors not heard from yet are always included.
    SharedTopics {
        #[serde(default = "default_min_shared")]
        min_shared: usize,
    },
    /// Skip neighbors believed to oppose the message
    AvoidOpposed {
        #[serde(default = "default_min_agreement")]
        min_agreement: f64,
    },
}

impl CommunicationRule {
    pub fn name(&self) -> &'static str {
        match self {
            CommunicationRule::Always => "always",
            CommunicationRule::Never => "never",
            CommunicationRule::SharedTopics { .. } => "shared_topics",
            CommunicationRule::AvoidOpposed { .. } => "avoid_opposed",
        }
    }

    /// Whether `outgoing` should go to a neighbor with the given hypothesized
    /// beliefs. `incoming_beliefs` are the beliefs of the message as received.
    pub fn communicate(
        &self,
        _interest: usize,
        incoming_beliefs: &[Belief],
        neighbor_beliefs: &BTreeMap<TopicId, i32>,
        outgoing: &Message,
    ) -> bool {
        match self {
            CommunicationRule::Always => true,
            CommunicationRule::Never => false,
            CommunicationRule::SharedTopics { min_shared } => {
                if neighbor_beliefs.is_empty() {
                    return true;
                }
                let shared = incoming_beliefs
                    .iter()
                    .filter(|b| neighbor_beliefs.contains_key(&b.topic))
                    .count();
                shared >= *min_shared
            }
            CommunicationRule::AvoidOpposed { min_agreement } => {
                let view = assess(neighbor_beliefs, &outgoing.beliefs_as_map());
                if view.agreement.is_empty() {
                    return true;
                }
                average(&view.agreement) >= *min_agreement
            }
        }
    }
}
