//! Message Type
//!
//! The belief-bearing payload that travels between agents.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

use crate::belief::Belief;
use crate::ids::{AgentId, TopicId};

/// Strength given to freshly generated seed messages
pub const DEFAULT_STRENGTH: i32 = 5;

/// Violations of the message invariants
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    /// The same topic appears more than once in one belief list
    #[error("duplicate topic '{topic}' in message beliefs")]
    DuplicateTopic { topic: TopicId },
}

/// A message carrying an ordered list of beliefs.
///
/// Topics are unique within one message. Messages are cloned whenever they
/// cross an agent boundary, so agents never share a mutable instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub strength: i32,
    pub beliefs: Vec<Belief>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<AgentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<AgentId>,
    /// Fitness annotation, written only by the search driver
    #[serde(default)]
    pub result: usize,
}

impl Message {
    pub fn new(strength: i32, beliefs: Vec<Belief>) -> Self {
        Self {
            strength,
            beliefs,
            source: None,
            destination: None,
            result: 0,
        }
    }

    pub fn with_source(mut self, source: impl Into<AgentId>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_destination(mut self, destination: impl Into<AgentId>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    /// Increment the opinion on `topic` by one. No-op if the topic is absent.
    ///
    /// The result is not clamped and may leave the [-2, 2] band.
    pub fn increase_belief(&mut self, topic: &TopicId) {
        if let Some(belief) = self.beliefs.iter_mut().find(|b| &b.topic == topic) {
            belief.opinion += 1;
        }
    }

    /// Decrement the opinion on `topic` by one. No-op if the topic is absent.
    pub fn decrease_belief(&mut self, topic: &TopicId) {
        if let Some(belief) = self.beliefs.iter_mut().find(|b| &b.topic == topic) {
            belief.opinion -= 1;
        }
    }

    /// Topic -> opinion view used for scoring.
    ///
    /// Duplicate topics are not reported here; the last one wins.
    pub fn beliefs_as_map(&self) -> BTreeMap<TopicId, i32> {
        self.beliefs
            .iter()
            .map(|b| (b.topic.clone(), b.opinion))
            .collect()
    }

    /// Opinion on a topic, if the message carries it
    pub fn opinion(&self, topic: &TopicId) -> Option<i32> {
        self.beliefs
            .iter()
            .find(|b| &b.topic == topic)
            .map(|b| b.opinion)
    }

    pub fn has_topic(&self, topic: &TopicId) -> bool {
        self.beliefs.iter().any(|b| &b.topic == topic)
    }

    pub fn topics(&self) -> impl Iterator<Item = &TopicId> {
        self.beliefs.iter().map(|b| &b.topic)
    }

    /// Check that every topic appears at most once
    pub fn validate(&self) -> Result<(), MessageError> {
        let mut seen = BTreeSet::new();
        for belief in &self.beliefs {
            if !seen.insert(&belief.topic) {
                return Err(MessageError::DuplicateTopic {
                    topic: belief.topic.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "strength {} [", self.strength)?;
        for (i, belief) in self.beliefs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", belief)?;
        }
        write!(f, "]")
    }
}
