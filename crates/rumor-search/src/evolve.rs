//! Evolution operators.
//!
//! Parent selection, crossover, mutation and the reproduce step that
//! combines them. Operators never touch a candidate's `result`; children
//! start unevaluated.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;

use rumor_types::{Belief, Message, Topic, TopicId};

use crate::generate::random_opinion;

/// The `num_parents` best-scoring candidates, best first.
///
/// The sort is stable, so ties keep population order.
pub fn select_parents(population: &[Message], num_parents: usize) -> Vec<Message> {
    let mut ranked: Vec<&Message> = population.iter().collect();
    ranked.sort_by(|a, b| b.result.cmp(&a.result));
    ranked.into_iter().take(num_parents).cloned().collect()
}

/// Average of two opinions, halves rounded to the even neighbor
fn average_opinion(a: i32, b: i32) -> i32 {
    let sum = a + b;
    let half = sum.div_euclid(2);
    if sum.rem_euclid(2) == 0 || half % 2 == 0 {
        half
    } else {
        half + 1
    }
}

/// Child of two parents.
///
/// Shared topics take the averaged opinion, the rest of both parents'
/// beliefs are carried over, and a random `max_beliefs` of them survive.
pub fn crossover<R: Rng>(
    parent1: &Message,
    parent2: &Message,
    max_beliefs: usize,
    strength: i32,
    rng: &mut R,
) -> Message {
    let other = parent2.beliefs_as_map();
    let common: BTreeSet<&TopicId> = parent1
        .beliefs
        .iter()
        .map(|b| &b.topic)
        .filter(|topic| other.contains_key(*topic))
        .collect();

    let mut beliefs: Vec<Belief> = parent1
        .beliefs
        .iter()
        .filter_map(|belief| {
            other
                .get(&belief.topic)
                .map(|theirs| Belief::new(belief.topic.clone(), average_opinion(belief.opinion, *theirs)))
        })
        .collect();
    beliefs.extend(
        parent1
            .beliefs
            .iter()
            .chain(parent2.beliefs.iter())
            .filter(|belief| !common.contains(&belief.topic))
            .cloned(),
    );

    beliefs.shuffle(rng);
    beliefs.truncate(max_beliefs);
    Message::new(strength, beliefs)
}

/// Copy of `message` where each belief, with probability `rate`, either gets
/// a fresh opinion or is swapped for a belief on a topic the message does
/// not cover yet.
pub fn mutate<R: Rng>(message: &Message, rate: f64, rng: &mut R) -> Message {
    let rate = rate.clamp(0.0, 1.0);
    let mut used: BTreeSet<TopicId> = message.topics().cloned().collect();
    let mut beliefs = Vec::with_capacity(message.beliefs.len());

    for belief in &message.beliefs {
        if !rng.gen_bool(rate) {
            beliefs.push(belief.clone());
            continue;
        }

        let fresh: Vec<TopicId> = Topic::all()
            .iter()
            .map(Topic::id)
            .filter(|topic| !used.contains(topic))
            .collect();
        let replace = rng.gen_bool(0.5);
        match fresh.choose(rng) {
            Some(topic) if replace => {
                used.insert(topic.clone());
                beliefs.push(Belief::new(topic.clone(), random_opinion(rng)));
            }
            // Vocabulary exhausted or a re-roll was drawn
            _ => beliefs.push(Belief::new(belief.topic.clone(), random_opinion(rng))),
        }
    }

    Message::new(message.strength, beliefs)
}

/// Cross `parent1` with the global best when there is one, otherwise with
/// `parent2`, then mutate the child.
pub fn reproduce<R: Rng>(
    parent1: &Message,
    parent2: &Message,
    global_best: Option<&Message>,
    mutation_rate: f64,
    max_beliefs: usize,
    strength: i32,
    rng: &mut R,
) -> Message {
    let mate = global_best.unwrap_or(parent2);
    let child = crossover(parent1, mate, max_beliefs, strength, rng);
    mutate(&child, mutation_rate, rng)
}
