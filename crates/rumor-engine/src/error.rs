//! Engine Errors
//!
//! Every error here is fatal to the run that raised it.

use rumor_types::{AgentId, MessageError};
use thiserror::Error;

/// Inconsistent topology or configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("agent '{agent}' has no hypothesis tracker for neighbor '{neighbor}'")]
    MissingHypothesis { agent: AgentId, neighbor: AgentId },

    #[error("agent '{agent}' has no decision rules")]
    NoDecisionRules { agent: AgentId },

    #[error("agent '{agent}' lists unknown neighbor '{neighbor}'")]
    UnknownNeighbor { agent: AgentId, neighbor: AgentId },

    #[error("agent '{agent}' links to itself")]
    SelfLink { agent: AgentId },

    #[error("agent '{agent}' is defined more than once")]
    DuplicateAgent { agent: AgentId },

    #[error("no agent named '{agent}' in the topology")]
    UnknownAgent { agent: AgentId },

    #[error("message has no destination")]
    MissingDestination,

    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Errors raised while running a propagation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("invariant violation: {0}")]
    InvariantViolation(#[from] MessageError),

    #[error("belief revision for agent '{agent}' did not settle within {passes} passes")]
    NonTerminationRisk { agent: AgentId, passes: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rumor_types::TopicId;

    #[test]
    fn test_error_messages() {
        let err: EngineError = ConfigurationError::MissingHypothesis {
            agent: AgentId::from("b"),
            neighbor: AgentId::from("z"),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "configuration error: agent 'b' has no hypothesis tracker for neighbor 'z'"
        );

        let err: EngineError = MessageError::DuplicateTopic {
            topic: TopicId::from("t"),
        }
        .into();
        assert!(err.to_string().starts_with("invariant violation"));
    }
}
