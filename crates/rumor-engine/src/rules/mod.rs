//! Deliberation Rules
//!
//! Belief, decision and communication rules. Each family is a closed,
//! serde-tagged enum so topologies can list them as configuration data.

pub mod belief;
pub mod communication;
pub mod decision;

pub use belief::{BeliefRevision, BeliefRule};
pub use communication::CommunicationRule;
pub use decision::{decision_constants, DecisionRule};
