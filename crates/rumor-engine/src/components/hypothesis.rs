//! Neighbor Hypotheses
//!
//! An agent's decaying estimate of what one neighbor believes, built only
//! from messages that neighbor has sent it.

use serde::Serialize;
use std::collections::BTreeMap;

use rumor_types::{Belief, TopicId};

/// Constants for hypothesis decay
pub mod hypothesis_constants {
    /// Age given to an entry when it is created or re-observed
    pub const FULL_AGE: u32 = 3;
}

/// One hypothesized belief and how many ticks it has left
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HypothesisEntry {
    pub belief: Belief,
    pub age: u32,
}

/// Hypothesized beliefs of a single neighbor.
///
/// Holds at most one entry per topic. Repeated observations of a topic are
/// summed rather than replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NeighborHypothesis {
    entries: Vec<HypothesisEntry>,
}

impl NeighborHypothesis {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one observed belief.
    ///
    /// A known topic has the observed opinion added to it and its age reset;
    /// an unknown topic starts a fresh entry at full age.
    pub fn add_belief_hypothesis(&mut self, belief: &Belief) {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|e| e.belief.topic == belief.topic)
        {
            entry.belief.opinion += belief.opinion;
            entry.age = hypothesis_constants::FULL_AGE;
            return;
        }

        self.entries.push(HypothesisEntry {
            belief: belief.clone(),
            age: hypothesis_constants::FULL_AGE,
        });
    }

    /// Age every entry by one tick and drop the ones that reach zero
    pub fn tick(&mut self) {
        for entry in self.entries.iter_mut() {
            entry.age = entry.age.saturating_sub(1);
        }
        self.entries.retain(|e| e.age > 0);
    }

    pub fn beliefs(&self) -> Vec<Belief> {
        self.entries.iter().map(|e| e.belief.clone()).collect()
    }

    pub fn beliefs_as_map(&self) -> BTreeMap<TopicId, i32> {
        self.entries
            .iter()
            .map(|e| (e.belief.topic.clone(), e.belief.opinion))
            .collect()
    }

    pub fn entry(&self, topic: &TopicId) -> Option<&HypothesisEntry> {
        self.entries.iter().find(|e| &e.belief.topic == topic)
    }

    pub fn entries(&self) -> &[HypothesisEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
