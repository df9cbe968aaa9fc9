//! Sample data fixtures for testing.
//!
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // rumor-types = { path = "../rumor-types", features = ["test-fixtures"] }
//!
//! use rumor_types::fixtures;
//!
//! let seed = fixtures::single_topic_seed();
//! ```

use crate::{Belief, Message, Topic};

/// Topic used by the single-topic fixtures
pub const FIXTURE_TOPIC: Topic = Topic::EconomyAndFinance;

/// A seed message with one strongly positive belief and default strength.
pub fn single_topic_seed() -> Message {
    Message::new(5, vec![Belief::new(FIXTURE_TOPIC.id(), 2)])
}

/// A seed message covering three topics with mixed opinions.
pub fn mixed_seed() -> Message {
    Message::new(
        5,
        vec![
            Belief::new(Topic::EconomyAndFinance.id(), 2),
            Belief::new(Topic::HealthAndWellness.id(), -1),
            Belief::new(Topic::TravelAndTourism.id(), 0),
        ],
    )
}

/// A message with no beliefs at all.
pub fn empty_message() -> Message {
    Message::new(5, Vec::new())
}

/// A message that breaks the topic-uniqueness invariant.
pub fn malformed_message() -> Message {
    Message::new(
        5,
        vec![
            Belief::new(FIXTURE_TOPIC.id(), 1),
            Belief::new(FIXTURE_TOPIC.id(), -1),
        ],
    )
}
