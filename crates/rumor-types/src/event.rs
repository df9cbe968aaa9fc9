//! Propagation Event Types
//!
//! Structured records of what happened during one propagation run. These are
//! observational only; nothing in the engine reads them back.

use serde::{Deserialize, Serialize};

use crate::ids::AgentId;

/// Primary event type categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropagationEventType {
    /// An agent received a message
    Received,
    /// An agent's belief revision changed its own beliefs
    Revised,
    /// A decision rule matched and produced an outgoing candidate
    Decided,
    /// A decision rule matched and suppressed the message
    Suppressed,
    /// No decision rule matched
    Ignored,
    /// A message was handed to the router for a neighbor
    Sent,
    /// The run hit its delivery budget and was cut short
    BudgetExhausted,
}

impl PropagationEventType {
    /// Returns all event type variants.
    pub fn all() -> &'static [PropagationEventType] {
        &[
            PropagationEventType::Received,
            PropagationEventType::Revised,
            PropagationEventType::Decided,
            PropagationEventType::Suppressed,
            PropagationEventType::Ignored,
            PropagationEventType::Sent,
            PropagationEventType::BudgetExhausted,
        ]
    }
}

/// A single propagation event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropagationEvent {
    /// Unique identifier (e.g., "evt_00000042")
    pub event_id: String,
    /// Delivery sequence number within the run
    pub tick: u64,
    pub event_type: PropagationEventType,
    /// Agent the event is about
    pub agent: AgentId,
    /// Sender for received messages, recipient for sent ones
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterpart: Option<AgentId>,
    /// Name of the decision rule involved, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    /// Message strength at the time of the event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<i32>,
    /// Free-form audit line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl PropagationEvent {
    pub fn new(
        event_id: impl Into<String>,
        tick: u64,
        event_type: PropagationEventType,
        agent: impl Into<AgentId>,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            tick,
            event_type,
            agent: agent.into(),
            counterpart: None,
            rule: None,
            strength: None,
            detail: None,
        }
    }

    pub fn with_counterpart(mut self, counterpart: impl Into<AgentId>) -> Self {
        self.counterpart = Some(counterpart.into());
        self
    }

    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    pub fn with_strength(mut self, strength: i32) -> Self {
        self.strength = Some(strength);
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Serializes the event to a JSON line (for JSONL format).
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes an event from a JSON line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Generates an event ID with the given sequence number.
pub fn generate_event_id(sequence: u64) -> String {
    format!("evt_{:08}", sequence)
}
