//! Canned Topologies
//!
//! Small undirected populations for tests and demos. Every agent gets the
//! default decision rules and no beliefs; callers add beliefs afterwards.

use crate::components::agent::Agent;

/// a - b - c - ...
pub fn line(names: &[&str]) -> Vec<Agent> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let mut agent = Agent::new(*name);
            if i > 0 {
                agent = agent.with_neighbor(names[i - 1]);
            }
            if let Some(next) = names.get(i + 1) {
                agent = agent.with_neighbor(*next);
            }
            agent
        })
        .collect()
}

/// A closed line. Fewer than three names degrade to a line.
pub fn ring(names: &[&str]) -> Vec<Agent> {
    let mut agents = line(names);
    if let [first, .., last] = agents.as_mut_slice() {
        if names.len() > 2 {
            first.neighbors.insert(last.name.clone());
            last.neighbors.insert(first.name.clone());
        }
    }
    agents
}

/// `hub` linked to every leaf, leaves linked only to the hub
pub fn star(hub: &str, leaves: &[&str]) -> Vec<Agent> {
    let mut agents = vec![Agent::new(hub).with_neighbors(leaves.iter().copied())];
    agents.extend(leaves.iter().map(|leaf| Agent::new(*leaf).with_neighbor(hub)));
    agents
}
