//! Agent Components
//!
//! Agents and the hypotheses they keep about their neighbors.

pub mod agent;
pub mod hypothesis;

pub use agent::{Agent, AgentSnapshot};
pub use hypothesis::{hypothesis_constants, HypothesisEntry, NeighborHypothesis};
