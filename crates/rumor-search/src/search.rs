//! The generational loop.
//!
//! Each generation is evaluated, its best candidates become parents, and a
//! full new population is bred from them. The best candidate ever seen
//! (the global best) is remembered and used as every child's second parent
//! once it exists.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use rumor_types::Message;

use crate::config::SearchConfig;
use crate::evaluate::{evaluate_population, evaluate_population_concurrent, PropagationEvaluator};
use crate::evolve::{reproduce, select_parents};
use crate::generate::generate_random_messages;
use crate::SearchError;

/// Result of a search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Best candidate found, with its fitness in `result`
    pub best: Option<Message>,
    /// Best fitness of each generation, in order
    pub evolution: Vec<usize>,
}

/// Tracks the global best across generations
#[derive(Debug, Default)]
struct Tracker {
    global_best: Option<Message>,
    last_best: Option<Message>,
    evolution: Vec<usize>,
}

impl Tracker {
    fn record(&mut self, generation: usize, population: &[Message]) {
        // First of the top scorers, like the parent ranking
        let Some(best) = select_parents(population, 1).into_iter().next() else {
            return;
        };
        info!(generation, best = best.result, "generation evaluated");
        self.evolution.push(best.result);

        let current = self.global_best.as_ref().map_or(0, |m| m.result);
        if best.result > current {
            self.global_best = Some(best.clone());
        }
        self.last_best = Some(best);
    }

    fn finish(self) -> SearchOutcome {
        SearchOutcome {
            best: self.global_best.or(self.last_best),
            evolution: self.evolution,
        }
    }
}

fn breed<R: Rng>(
    population: &[Message],
    global_best: Option<&Message>,
    config: &SearchConfig,
    rng: &mut R,
) -> Vec<Message> {
    let parents = select_parents(population, config.num_parents);
    if parents.is_empty() {
        return Vec::new();
    }

    (0..config.population_size)
        .map(|_| {
            let parent1 = &parents[rng.gen_range(0..parents.len())];
            let parent2 = &parents[rng.gen_range(0..parents.len())];
            reproduce(
                parent1,
                parent2,
                global_best,
                config.mutation_rate,
                config.max_child_beliefs,
                config.initial_strength,
                rng,
            )
        })
        .collect()
}

fn initial_population<R: Rng>(config: &SearchConfig, rng: &mut R) -> Vec<Message> {
    generate_random_messages(
        config.population_size,
        config.topics_per_message,
        config.initial_strength,
        rng,
    )
}

/// Run the search, evaluating candidates one after another
pub fn genetic_algorithm<R: Rng>(
    config: &SearchConfig,
    evaluator: &mut PropagationEvaluator,
    rng: &mut R,
) -> Result<SearchOutcome, SearchError> {
    config.validate()?;
    let mut population = initial_population(config, rng);
    let mut tracker = Tracker::default();

    for generation in 0..config.generations {
        evaluate_population(&mut population, evaluator)?;
        let next = breed(&population, tracker.global_best.as_ref(), config, rng);
        tracker.record(generation, &population);
        population = next;
    }

    Ok(tracker.finish())
}

/// Run the search, evaluating each generation on blocking tasks.
///
/// Produces the same outcome as [`genetic_algorithm`] for the same inputs.
pub async fn genetic_algorithm_concurrent<R: Rng>(
    config: &SearchConfig,
    evaluator: &PropagationEvaluator,
    rng: &mut R,
) -> Result<SearchOutcome, SearchError> {
    config.validate()?;
    let mut population = initial_population(config, rng);
    let mut tracker = Tracker::default();

    for generation in 0..config.generations {
        evaluate_population_concurrent(&mut population, evaluator).await?;
        let next = breed(&population, tracker.global_best.as_ref(), config, rng);
        tracker.record(generation, &population);
        population = next;
    }

    Ok(tracker.finish())
}
