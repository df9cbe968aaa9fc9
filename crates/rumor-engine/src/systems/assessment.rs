//! Agreement and Interest Scoring
//!
//! Compares an agent's beliefs with a message's beliefs topic by topic.

use std::collections::{BTreeMap, BTreeSet};

use rumor_types::TopicId;

/// Largest opinion distance inside the [-2, 2] band
pub const MAX_OPINION_DISTANCE: f64 = 4.0;

/// How an agent relates to one message
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assessment {
    /// Per common topic: 1.0 for identical opinions, 0.0 for opposite extremes
    pub agreement: BTreeMap<TopicId, f64>,
    /// Number of topics shared by agent and message
    pub interest: usize,
    pub common_topics: BTreeSet<TopicId>,
}

impl Assessment {
    /// Mean agreement over the common topics, 0.0 when there are none
    pub fn average_agreement(&self) -> f64 {
        average(&self.agreement)
    }

    pub fn has_common_topics(&self) -> bool {
        !self.common_topics.is_empty()
    }
}

/// Agreement between two opinions on the same topic.
///
/// Opinions that drifted outside [-2, 2] can push this below zero.
pub fn topic_agreement(agent_opinion: i32, message_opinion: i32) -> f64 {
    let distance = (agent_opinion - message_opinion).abs() as f64;
    1.0 - distance / MAX_OPINION_DISTANCE
}

/// Score a message against an agent's beliefs
pub fn assess(
    agent_beliefs: &BTreeMap<TopicId, i32>,
    message_beliefs: &BTreeMap<TopicId, i32>,
) -> Assessment {
    let mut agreement = BTreeMap::new();
    let mut common_topics = BTreeSet::new();

    for (topic, agent_opinion) in agent_beliefs {
        if let Some(message_opinion) = message_beliefs.get(topic) {
            agreement.insert(topic.clone(), topic_agreement(*agent_opinion, *message_opinion));
            common_topics.insert(topic.clone());
        }
    }

    Assessment {
        interest: common_topics.len(),
        agreement,
        common_topics,
    }
}

/// Mean of a score map, 0.0 when empty
pub fn average(scores: &BTreeMap<TopicId, f64>) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.values().sum::<f64>() / scores.len() as f64
}
