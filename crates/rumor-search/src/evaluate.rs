//! Fitness evaluation.
//!
//! A candidate's fitness is the number of distinct agents its propagation
//! run reaches. Every run starts from the pristine topology and the engine
//! seed, so fitness is a pure function of the candidate.

use tokio::task::JoinSet;
use tracing::debug;

use rumor_engine::{ConfigurationError, EngineError, Environment, RunStats};
use rumor_types::{AgentId, Message};

use crate::SearchError;

/// Runs candidates through one topology
#[derive(Debug)]
pub struct PropagationEvaluator {
    environment: Environment,
    initial_agents: Vec<AgentId>,
}

impl PropagationEvaluator {
    /// `initial_agents` empty means every agent of the topology is seeded.
    pub fn new(environment: Environment, initial_agents: Vec<AgentId>) -> Result<Self, SearchError> {
        let initial_agents = if initial_agents.is_empty() {
            environment.agents().keys().cloned().collect()
        } else {
            initial_agents
        };
        if let Some(unknown) = initial_agents
            .iter()
            .find(|name| environment.agent(name).is_none())
        {
            return Err(EngineError::from(ConfigurationError::UnknownAgent {
                agent: unknown.clone(),
            })
            .into());
        }

        Ok(Self {
            environment,
            initial_agents,
        })
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn initial_agents(&self) -> &[AgentId] {
        &self.initial_agents
    }

    /// One full propagation run for `message`
    pub fn evaluate(&mut self, message: &Message) -> Result<RunStats, EngineError> {
        self.environment.run_simulation(message, &self.initial_agents)
    }

    fn fork(&self) -> Self {
        Self {
            environment: self.environment.fork(),
            initial_agents: self.initial_agents.clone(),
        }
    }
}

/// Evaluate every candidate in order and store its fitness in `result`
pub fn evaluate_population(
    population: &mut [Message],
    evaluator: &mut PropagationEvaluator,
) -> Result<(), SearchError> {
    for (index, message) in population.iter_mut().enumerate() {
        let stats = evaluator.evaluate(message)?;
        message.result = stats.notified_count();
        debug!(candidate = index, fitness = message.result, "candidate evaluated");
    }
    Ok(())
}

/// Same as [`evaluate_population`], with one blocking task per candidate.
///
/// Tasks run on forked environments, so the evaluator's event log (if any)
/// does not see these runs.
pub async fn evaluate_population_concurrent(
    population: &mut [Message],
    evaluator: &PropagationEvaluator,
) -> Result<(), SearchError> {
    let mut join_set = JoinSet::new();

    for (index, message) in population.iter().enumerate() {
        let mut worker = evaluator.fork();
        let message = message.clone();
        join_set.spawn_blocking(move || {
            worker
                .evaluate(&message)
                .map(|stats| (index, stats.notified_count()))
        });
    }

    while let Some(joined) = join_set.join_next().await {
        let (index, fitness) = joined??;
        population[index].result = fitness;
        debug!(candidate = index, fitness, "candidate evaluated");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rumor_engine::setup::shapes;
    use rumor_engine::EngineConfig;
    use rumor_types::{Belief, Topic};

    fn evaluator() -> PropagationEvaluator {
        let mut agents = shapes::line(&["a", "b", "c"]);
        for agent in agents.iter_mut() {
            agent.beliefs.insert(Topic::EconomyAndFinance.id(), 2);
        }
        let environment = Environment::new(agents, EngineConfig::default()).unwrap();
        PropagationEvaluator::new(environment, vec![AgentId::from("a")]).unwrap()
    }

    fn population() -> Vec<Message> {
        vec![
            Message::new(5, vec![Belief::new(Topic::EconomyAndFinance.id(), 2)]),
            Message::new(5, vec![Belief::new(Topic::EconomyAndFinance.id(), -2)]),
            Message::new(5, Vec::new()),
        ]
    }

    #[test]
    fn test_every_candidate_is_evaluated() {
        let mut evaluator = evaluator();
        let mut population = population();

        evaluate_population(&mut population, &mut evaluator).unwrap();

        // Full agreement reaches the whole line
        assert_eq!(population[0].result, 3);
        // The seeded agent is always reached
        assert!(population.iter().all(|m| m.result >= 1));
    }

    #[test]
    fn test_empty_initial_agents_seed_everyone() {
        let environment = Environment::new(shapes::line(&["a", "b"]), EngineConfig::default()).unwrap();
        let evaluator = PropagationEvaluator::new(environment, Vec::new()).unwrap();
        assert_eq!(evaluator.initial_agents().len(), 2);
    }

    #[test]
    fn test_unknown_initial_agent() {
        let environment = Environment::new(shapes::line(&["a", "b"]), EngineConfig::default()).unwrap();
        let err = PropagationEvaluator::new(environment, vec![AgentId::from("x")]).unwrap_err();
        assert!(matches!(err, SearchError::Engine(EngineError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_concurrent_matches_sequential() {
        let mut sequential = population();
        evaluate_population(&mut sequential, &mut evaluator()).unwrap();

        let mut concurrent = population();
        evaluate_population_concurrent(&mut concurrent, &evaluator()).await.unwrap();

        let fitness = |p: &[Message]| p.iter().map(|m| m.result).collect::<Vec<_>>();
        assert_eq!(fitness(&sequential), fitness(&concurrent));
    }
}
