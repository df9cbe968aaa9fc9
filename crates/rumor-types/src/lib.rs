//! Shared data types for the rumor propagation workspace.
//!
//! This crate contains pure data structures with no deliberation logic.
//! It is a dependency for all other crates in the workspace.

pub mod belief;
pub mod event;
pub mod ids;
pub mod message;
pub mod topic;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;

pub use belief::{clamp_opinion, Belief, MAX_OPINION, MIN_OPINION};
pub use event::{generate_event_id, PropagationEvent, PropagationEventType};
pub use ids::{AgentId, TopicId};
pub use message::{Message, MessageError, DEFAULT_STRENGTH};
pub use topic::Topic;
