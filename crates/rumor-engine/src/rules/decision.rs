//! Decision Rules
//!
//! Rules that decide whether and how an agent retransmits a message. An agent
//! holds an ordered list of them; the first rule whose `decide` returns true
//! is the only one that gets to `alter` the message.
//!
//! Agreement scores live in [0, 1] with 0.5 as the neutral point, so the
//! default thresholds sit on that scale: 0.25 is "mostly opposed" and 0.75
//! "mostly aligned".

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use rumor_types::{AgentId, Message, TopicId};

use crate::error::ConfigurationError;
use crate::systems::assessment::Assessment;

/// Default thresholds for the built-in decision rules
pub mod decision_constants {
    /// Agreement: relay when average agreement is at least this
    pub const AGREEMENT_THRESHOLD: f64 = 0.5;
    /// Agreement: minimum shared topics
    pub const AGREEMENT_MIN_INTEREST: usize = 1;
    /// Agreement: strength added to relayed messages
    pub const AGREEMENT_STRENGTH_BONUS: i32 = 4;
    /// Disagreement: suppress when average agreement is below this
    pub const DISAGREEMENT_THRESHOLD: f64 = 0.25;
    /// Disagreement and Adjust: minimum shared topics (interest > 1)
    pub const SPECIALIZED_MIN_INTEREST: usize = 2;
    /// Adjust: lower bound of the moderation window (inclusive)
    pub const ADJUST_LOW: f64 = 0.25;
    /// Adjust: upper bound of the moderation window (inclusive)
    pub const ADJUST_HIGH: f64 = 0.75;
    /// Adjust: topics agreed with above this are pushed up, the rest down
    pub const ADJUST_PIVOT: f64 = 0.5;
    /// Random: probability of relaying
    pub const RANDOM_PROBABILITY: f64 = 0.5;
}

use decision_constants as dc;

fn default_agreement_threshold() -> f64 {
    dc::AGREEMENT_THRESHOLD
}
fn default_agreement_interest() -> usize {
    dc::AGREEMENT_MIN_INTEREST
}
fn default_strength_bonus() -> i32 {
    dc::AGREEMENT_STRENGTH_BONUS
}
fn default_disagreement_threshold() -> f64 {
    dc::DISAGREEMENT_THRESHOLD
}
fn default_specialized_interest() -> usize {
    dc::SPECIALIZED_MIN_INTEREST
}
fn default_adjust_low() -> f64 {
    dc::ADJUST_LOW
}
fn default_adjust_high() -> f64 {
    dc::ADJUST_HIGH
}
fn default_adjust_pivot() -> f64 {
    dc::ADJUST_PIVOT
}
fn default_random_probability() -> f64 {
    dc::RANDOM_PROBABILITY
}

/// Built-in decision rules.
///
/// Thresholds are part of each rule's configuration; the defaults are the
/// canonical values from [`decision_constants`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecisionRule {
    /// Relay a strengthened copy when the agent broadly agrees
    Agreement {
        #[serde(default = "default_agreement_threshold")]
        min_agreement: f64,
        #[serde(default = "default_agreement_interest")]
        min_interest: usize,
        #[serde(default = "default_strength_bonus")]
        strength_bonus: i32,
    },
    /// Suppress the message when the agent strongly disagrees
    Disagreement {
        #[serde(default = "default_disagreement_threshold")]
        below_agreement: f64,
        #[serde(default = "default_specialized_interest")]
        min_interest: usize,
    },
    /// Nudge each shared topic before relaying when agreement is moderate
    Adjust {
        #[serde(default = "default_adjust_low")]
        low: f64,
        #[serde(default = "default_adjust_high")]
        high: f64,
        #[serde(default = "default_adjust_pivot")]
        pivot: f64,
        #[serde(default = "default_specialized_interest")]
        min_interest: usize,
    },
    /// Relay unchanged on a coin flip
    Random {
        #[serde(default = "default_random_probability")]
        probability: f64,
    },
}

impl DecisionRule {
    pub fn agreement() -> Self {
        DecisionRule::Agreement {
            min_agreement: dc::AGREEMENT_THRESHOLD,
            min_interest: dc::AGREEMENT_MIN_INTEREST,
            strength_bonus: dc::AGREEMENT_STRENGTH_BONUS,
        }
    }

    pub fn disagreement() -> Self {
        DecisionRule::Disagreement {
            below_agreement: dc::DISAGREEMENT_THRESHOLD,
            min_interest: dc::SPECIALIZED_MIN_INTEREST,
        }
    }

    pub fn adjust() -> Self {
        DecisionRule::Adjust {
            low: dc::ADJUST_LOW,
            high: dc::ADJUST_HIGH,
            pivot: dc::ADJUST_PIVOT,
            min_interest: dc::SPECIALIZED_MIN_INTEREST,
        }
    }

    pub fn random() -> Self {
        DecisionRule::Random {
            probability: dc::RANDOM_PROBABILITY,
        }
    }

    /// The order used when a topology does not list decision rules
    pub fn default_rules() -> Vec<DecisionRule> {
        vec![
            DecisionRule::agreement(),
            DecisionRule::disagreement(),
            DecisionRule::adjust(),
            DecisionRule::random(),
        ]
    }

    /// Reject thresholds that would make `decide` meaningless or panic
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let finite = |field: &'static str, value: f64| {
            if value.is_finite() {
                Ok(())
            } else {
                Err(ConfigurationError::InvalidValue {
                    field,
                    reason: format!("{} is not a finite number", value),
                })
            }
        };

        match self {
            DecisionRule::Agreement { min_agreement, .. } => finite("min_agreement", *min_agreement),
            DecisionRule::Disagreement { below_agreement, .. } => {
                finite("below_agreement", *below_agreement)
            }
            DecisionRule::Adjust { low, high, pivot, .. } => {
                finite("low", *low)?;
                finite("high", *high)?;
                finite("pivot", *pivot)
            }
            DecisionRule::Random { probability } => {
                finite("probability", *probability)?;
                if !(0.0..=1.0).contains(probability) {
                    return Err(ConfigurationError::InvalidValue {
                        field: "probability",
                        reason: format!("{} is outside [0, 1]", probability),
                    });
                }
                Ok(())
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DecisionRule::Agreement { .. } => "agreement",
            DecisionRule::Disagreement { .. } => "disagreement",
            DecisionRule::Adjust { .. } => "adjust",
            DecisionRule::Random { .. } => "random",
        }
    }

    /// Whether this rule claims the message.
    ///
    /// Decisions are taken against the assessment computed before belief
    /// revision, so `_agent_beliefs` is the post-revision view and is only
    /// informational for the built-in rules.
    pub fn decide<R: Rng>(
        &self,
        _agent_beliefs: &BTreeMap<TopicId, i32>,
        assessment: &Assessment,
        _message: &Message,
        rng: &mut R,
    ) -> bool {
        let average = assessment.average_agreement();
        let interest = assessment.interest;

        match self {
            DecisionRule::Agreement {
                min_agreement,
                min_interest,
                ..
            } => average >= *min_agreement && interest >= *min_interest,
            DecisionRule::Disagreement {
                below_agreement,
                min_interest,
            } => average < *below_agreement && interest >= *min_interest,
            DecisionRule::Adjust {
                low,
                high,
                min_interest,
                ..
            } => {
                assessment.has_common_topics()
                    && (*low..=*high).contains(&average)
                    && interest >= *min_interest
            }
            DecisionRule::Random { probability } => rng.gen_bool(*probability),
        }
    }

    /// The outgoing candidate, or `None` to suppress retransmission
    pub fn alter(
        &self,
        _agent_beliefs: &BTreeMap<TopicId, i32>,
        assessment: &Assessment,
        message: &Message,
    ) -> Option<Message> {
        match self {
            DecisionRule::Agreement { strength_bonus, .. } => {
                let mut altered = message.clone();
                altered.strength += strength_bonus;
                Some(altered)
            }
            DecisionRule::Disagreement { .. } => None,
            DecisionRule::Adjust { pivot, .. } => {
                let mut altered = message.clone();
                for topic in &assessment.common_topics {
                    let agreement = assessment.agreement.get(topic).copied().unwrap_or(0.0);
                    if agreement > *pivot {
                        altered.increase_belief(topic);
                    } else {
                        altered.decrease_belief(topic);
                    }
                }
                Some(altered)
            }
            DecisionRule::Random { .. } => Some(message.clone()),
        }
    }

    /// Audit line for the external reporter
    pub fn report(&self, agent: &AgentId, new_message: &Message) -> String {
        let target = new_message
            .destination
            .as_ref()
            .map(|d| d.as_str())
            .unwrap_or("nobody");
        match self {
            DecisionRule::Agreement { .. } => format!(
                "{} agrees and relays to {} at strength {}: {}",
                agent, target, new_message.strength, new_message
            ),
            DecisionRule::Disagreement { .. } => {
                format!("{} disagrees and withholds the message", agent)
            }
            DecisionRule::Adjust { .. } => format!(
                "{} adjusts the message before relaying to {}: {}",
                agent, target, new_message
            ),
            DecisionRule::Random { .. } => format!(
                "{} relays to {} on a whim: {}",
                agent, target, new_message
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::assessment::assess;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use rumor_types::Belief;

    fn assessment_of(agent: &[(&str, i32)], message: &Message) -> (BTreeMap<TopicId, i32>, Assessment) {
        let beliefs: BTreeMap<TopicId, i32> = agent.iter().map(|(t, o)| (TopicId::from(*t), *o)).collect();
        let assessment = assess(&beliefs, &message.beliefs_as_map());
        (beliefs, assessment)
    }

    fn first_match<'a>(
        rules: &'a [DecisionRule],
        beliefs: &BTreeMap<TopicId, i32>,
        assessment: &Assessment,
        message: &Message,
    ) -> Option<(&'a DecisionRule, Option<Message>)> {
        let mut rng = SmallRng::seed_from_u64(1);
        rules
            .iter()
            .find(|r| r.decide(beliefs, assessment, message, &mut rng))
            .map(|r| (r, r.alter(beliefs, assessment, message)))
    }

    #[test]
    fn test_agreement_boosts_strength() {
        let message = Message::new(5, vec![Belief::new("t", 2)]);
        let (beliefs, assessment) = assessment_of(&[("t", 2)], &message);
        let mut rng = SmallRng::seed_from_u64(1);

        let rule = DecisionRule::agreement();
        assert!(rule.decide(&beliefs, &assessment, &message, &mut rng));
        let altered = rule.alter(&beliefs, &assessment, &message).unwrap();
        assert_eq!(altered.strength, 9);
        assert_eq!(message.strength, 5);
    }

    #[test]
    fn test_interest_gates() {
        let message = Message::new(5, vec![Belief::new("t", 2)]);
        let (beliefs, assessment) = assessment_of(&[("t", 2)], &message);
        let mut rng = SmallRng::seed_from_u64(1);

        // One shared topic is enough for Agreement but not for the specialized rules
        assert!(!DecisionRule::Disagreement { below_agreement: 2.0, min_interest: 2 }
            .decide(&beliefs, &assessment, &message, &mut rng));
        assert!(!DecisionRule::Adjust { low: 0.0, high: 1.0, pivot: 0.5, min_interest: 2 }
            .decide(&beliefs, &assessment, &message, &mut rng));
    }

    #[test]
    fn test_empty_message_only_random_can_fire() {
        let message = Message::new(5, Vec::new());
        let (beliefs, assessment) = assessment_of(&[("t", 2)], &message);
        let mut rng = SmallRng::seed_from_u64(1);

        for rule in [DecisionRule::agreement(), DecisionRule::disagreement(), DecisionRule::adjust()] {
            assert!(!rule.decide(&beliefs, &assessment, &message, &mut rng));
        }
        assert!(DecisionRule::Random { probability: 1.0 }.decide(&beliefs, &assessment, &message, &mut rng));
    }

    #[test]
    fn test_first_match_wins() {
        let message = Message::new(5, vec![Belief::new("a", 2), Belief::new("b", 2)]);
        let (beliefs, assessment) = assessment_of(&[("a", 2), ("b", 1)], &message);
        // Average agreement 0.875: satisfies Agreement and this recalibrated Disagreement
        let disagreement = DecisionRule::Disagreement { below_agreement: 0.9, min_interest: 2 };

        let rules = vec![disagreement.clone(), DecisionRule::agreement()];
        let (rule, outcome) = first_match(&rules, &beliefs, &assessment, &message).unwrap();
        assert_eq!(rule.name(), "disagreement");
        assert!(outcome.is_none());

        let swapped = vec![DecisionRule::agreement(), disagreement];
        let (rule, outcome) = first_match(&swapped, &beliefs, &assessment, &message).unwrap();
        assert_eq!(rule.name(), "agreement");
        assert_eq!(outcome.unwrap().strength, 9);
    }

    #[test]
    fn test_adjust_nudges_common_topics_only() {
        let message = Message::new(
            5,
            vec![Belief::new("t", 1), Belief::new("u", -1), Belief::new("x", 2)],
        );
        let beliefs = BTreeMap::from([(TopicId::from("t"), 0), (TopicId::from("u"), 1)]);
        let assessment = Assessment {
            agreement: BTreeMap::from([(TopicId::from("t"), 0.75), (TopicId::from("u"), 0.25)]),
            interest: 2,
            common_topics: [TopicId::from("t"), TopicId::from("u")].into_iter().collect(),
        };
        let mut rng = SmallRng::seed_from_u64(1);

        let rule = DecisionRule::adjust();
        assert!(rule.decide(&beliefs, &assessment, &message, &mut rng));
        let altered = rule.alter(&beliefs, &assessment, &message).unwrap();

        assert_eq!(altered.opinion(&TopicId::from("t")), Some(2));
        assert_eq!(altered.opinion(&TopicId::from("u")), Some(-2));
        assert_eq!(altered.opinion(&TopicId::from("x")), Some(2));
        assert_eq!(altered.strength, message.strength);
    }

    #[test]
    fn test_default_rules_suppress_opposed_message() {
        let message = Message::new(5, vec![Belief::new("t", -2), Belief::new("u", -2)]);
        let (beliefs, assessment) = assessment_of(&[("t", 2), ("u", 2)], &message);
        assert_eq!(assessment.average_agreement(), 0.0);

        let rules = DecisionRule::default_rules();
        let (rule, outcome) = first_match(&rules, &beliefs, &assessment, &message).unwrap();
        assert_eq!(rule.name(), "disagreement");
        assert!(outcome.is_none());
    }

    #[test]
    fn test_default_rules_adjust_lukewarm_message() {
        // Agreement 0.75 on t and 0.0 on u: average 0.375
        let message = Message::new(5, vec![Belief::new("t", 1), Belief::new("u", -2)]);
        let (beliefs, assessment) = assessment_of(&[("t", 2), ("u", 2)], &message);

        let rules = DecisionRule::default_rules();
        let (rule, outcome) = first_match(&rules, &beliefs, &assessment, &message).unwrap();
        assert_eq!(rule.name(), "adjust");
        let altered = outcome.unwrap();
        assert_eq!(altered.opinion(&TopicId::from("t")), Some(2));
        assert_eq!(altered.opinion(&TopicId::from("u")), Some(-3));
    }

    #[test]
    fn test_validate_rejects_bad_thresholds() {
        assert!(DecisionRule::default_rules().iter().all(|r| r.validate().is_ok()));

        let err = DecisionRule::Random { probability: f64::NAN }.validate().unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidValue { field: "probability", .. }));
        assert!(DecisionRule::Random { probability: 1.5 }.validate().is_err());
        assert!(DecisionRule::Disagreement { below_agreement: f64::INFINITY, min_interest: 2 }
            .validate()
            .is_err());
    }

    #[test]
    fn test_random_is_seed_deterministic() {
        let message = Message::new(5, Vec::new());
        let (beliefs, assessment) = assessment_of(&[], &message);
        let rule = DecisionRule::random();

        let flips = |seed: u64| {
            let mut rng = SmallRng::seed_from_u64(seed);
            (0..32)
                .map(|_| rule.decide(&beliefs, &assessment, &message, &mut rng))
                .collect::<Vec<_>>()
        };
        assert_eq!(flips(9), flips(9));
        assert!(flips(9).contains(&true) && flips(9).contains(&false));
    }

    #[test]
    fn test_report_mentions_agent_and_target() {
        let message = Message::new(9, vec![Belief::new("t", 2)]).with_destination("agent_c");
        let line = DecisionRule::agreement().report(&AgentId::from("agent_b"), &message);
        assert!(line.contains("agent_b"));
        assert!(line.contains("agent_c"));
        assert!(line.contains("strength 9"));
    }

    #[test]
    fn test_deserialize_from_toml() {
        #[derive(Deserialize)]
        struct Holder {
            rules: Vec<DecisionRule>,
        }
        let holder: Holder = toml::from_str(
            r#"
            rules = [
                { kind = "disagreement" },
                { kind = "agreement", strength_bonus = 1 },
                { kind = "random", probability = 0.25 },
            ]
            "#,
        )
        .unwrap();
        assert_eq!(holder.rules[0], DecisionRule::disagreement());
        assert_eq!(
            holder.rules[1],
            DecisionRule::Agreement { min_agreement: 0.5, min_interest: 1, strength_bonus: 1 }
        );
        assert_eq!(holder.rules[2], DecisionRule::Random { probability: 0.25 });
    }
}
