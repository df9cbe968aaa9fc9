//! Belief Rules
//!
//! Rules that revise an agent's own beliefs after it reads a message. The
//! engine applies them repeatedly until a full pass changes nothing (see
//! [`crate::systems::revision`]).
//!
//! Contract for rule authors: a rule must stop reporting change once its own
//! preconditions are exhausted. The built-in rules move opinions one step at a
//! time toward a fixed target or a fixed bound, so each settles after at most
//! four changes per topic.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use rumor_types::{clamp_opinion, Message, TopicId};

use crate::systems::assessment::Assessment;

/// A rule that may mutate an agent's beliefs in response to a message
pub trait BeliefRevision {
    /// Apply the rule once. Returns true if any belief changed.
    fn change(
        &self,
        beliefs: &mut BTreeMap<TopicId, i32>,
        assessment: &Assessment,
        message: &Message,
    ) -> bool;
}

fn default_conform_agreement() -> f64 {
    0.75
}

fn default_adopt_interest() -> usize {
    1
}

fn default_entrench_agreement() -> f64 {
    0.25
}

/// Built-in belief rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BeliefRule {
    /// Step opinions on well-agreed common topics toward the message
    Conform {
        #[serde(default = "default_conform_agreement")]
        min_agreement: f64,
    },
    /// Take on the message's opinions for topics the agent has no view on
    Adopt {
        #[serde(default = "default_adopt_interest")]
        min_interest: usize,
    },
    /// Step opinions on poorly-agreed common topics away from the message
    Entrench {
        #[serde(default = "default_entrench_agreement")]
        max_agreement: f64,
    },
}

impl BeliefRule {
    pub fn conform() -> Self {
        BeliefRule::Conform {
            min_agreement: default_conform_agreement(),
        }
    }

    pub fn adopt() -> Self {
        BeliefRule::Adopt {
            min_interest: default_adopt_interest(),
        }
    }

    pub fn entrench() -> Self {
        BeliefRule::Entrench {
            max_agreement: default_entrench_agreement(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BeliefRule::Conform { .. } => "conform",
            BeliefRule::Adopt { .. } => "adopt",
            BeliefRule::Entrench { .. } => "entrench",
        }
    }
}

impl BeliefRevision for BeliefRule {
    fn change(
        &self,
        beliefs: &mut BTreeMap<TopicId, i32>,
        assessment: &Assessment,
        message: &Message,
    ) -> bool {
        match self {
            BeliefRule::Conform { min_agreement } => {
                let mut changed = false;
                for topic in &assessment.common_topics {
                    let agrees = assessment
                        .agreement
                        .get(topic)
                        .is_some_and(|score| *score >= *min_agreement);
                    let (Some(target), Some(current)) = (message.opinion(topic), beliefs.get_mut(topic)) else {
                        continue;
                    };
                    let target = clamp_opinion(target);
                    if agrees && *current != target {
                        *current += (target - *current).signum();
                        changed = true;
                    }
                }
                changed
            }
            BeliefRule::Adopt { min_interest } => {
                if assessment.interest < *min_interest {
                    return false;
                }
                let mut changed = false;
                for belief in &message.beliefs {
                    if !beliefs.contains_key(&belief.topic) {
                        beliefs.insert(belief.topic.clone(), clamp_opinion(belief.opinion));
                        changed = true;
                    }
                }
                changed
            }
            BeliefRule::Entrench { max_agreement } => {
                let mut changed = false;
                for topic in &assessment.common_topics {
                    let opposed = assessment
                        .agreement
                        .get(topic)
                        .is_some_and(|score| *score <= *max_agreement);
                    let (Some(other), Some(current)) = (message.opinion(topic), beliefs.get_mut(topic)) else {
                        continue;
                    };
                    let direction = (*current - other).signum();
                    if !opposed || direction == 0 {
                        continue;
                    }
                    let next = clamp_opinion(*current + direction);
                    if next != *current {
                        *current = next;
                        changed = true;
                    }
                }
                changed
            }
        }
    }
}
