//! Candidate generation.
//!
//! Builds seed messages for the initial population.

use rand::Rng;

use rumor_types::{Belief, Message, Topic, MAX_OPINION, MIN_OPINION};

/// Uniform opinion in the valid range
pub fn random_opinion<R: Rng>(rng: &mut R) -> i32 {
    rng.gen_range(MIN_OPINION..=MAX_OPINION)
}

/// `num_messages` messages, each on `topics_per_message` distinct random
/// topics with random opinions.
pub fn generate_random_messages<R: Rng>(
    num_messages: usize,
    topics_per_message: usize,
    strength: i32,
    rng: &mut R,
) -> Vec<Message> {
    (0..num_messages)
        .map(|_| {
            let topics = Topic::select_random_topics(topics_per_message, rng);
            let beliefs = topics
                .iter()
                .map(|topic| Belief::new(topic.id(), random_opinion(rng)))
                .collect();
            Message::new(strength, beliefs)
        })
        .collect()
}

/// `num_messages` messages that all cover exactly `topics`, with random
/// opinions. Repeated topics are kept once.
pub fn generate_messages_with_specific_topics<R: Rng>(
    topics: &[Topic],
    num_messages: usize,
    strength: i32,
    rng: &mut R,
) -> Vec<Message> {
    let mut unique: Vec<Topic> = Vec::with_capacity(topics.len());
    for topic in topics {
        if !unique.contains(topic) {
            unique.push(*topic);
        }
    }

    (0..num_messages)
        .map(|_| {
            let beliefs = unique
                .iter()
                .map(|topic| Belief::new(topic.id(), random_opinion(rng)))
                .collect();
            Message::new(strength, beliefs)
        })
        .collect()
}
