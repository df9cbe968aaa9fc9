//! Belief Type
//!
//! A single (topic, opinion) pair carried by messages and held by agents.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::TopicId;

/// Lowest opinion a producer may assign
pub const MIN_OPINION: i32 = -2;

/// Highest opinion a producer may assign
pub const MAX_OPINION: i32 = 2;

/// Clamp an opinion into the nominal [-2, 2] band
pub fn clamp_opinion(opinion: i32) -> i32 {
    opinion.clamp(MIN_OPINION, MAX_OPINION)
}

/// An opinion about one topic.
///
/// The [-2, 2] range is respected by producers (generators, mutation,
/// belief rules); `Belief` itself does not enforce it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Belief {
    pub topic: TopicId,
    pub opinion: i32,
}

impl Belief {
    pub fn new(topic: impl Into<TopicId>, opinion: i32) -> Self {
        Self {
            topic: topic.into(),
            opinion,
        }
    }
}

impl fmt::Display for Belief {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.topic, self.opinion)
    }
}
